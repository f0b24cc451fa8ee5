#![cfg_attr(not(test), no_std)]

//! rtb - Return-to-base for small autonomous vehicles
//!
//! Records the outbound route as a compact waypoint path and guides the
//! vehicle back along it. The algorithms live in the `rtb_core` crate; this
//! crate adds logging and shared-state plumbing for embedded targets.
//!
//! # Features
//!
//! - **`embassy`**: Global `RTB` controller behind a critical-section Mutex
//! - **`defmt`**: Route log macros to defmt

// Core infrastructure (logging, shared state)
pub mod core;

// Subsystems (return-to-base wrapper)
pub mod subsystems;

pub use rtb_core::{error, mode, navigation, parameters};
pub use rtb_core::{Kinematics, Position, ReturnToBase, RtbConfig, RtbError, RtbMode, RtbStatus};
