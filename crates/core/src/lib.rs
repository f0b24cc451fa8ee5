//! rtb_core - Pure no_std return-to-base logic
//!
//! This crate contains the platform-agnostic path recorder, guide, and mode
//! controller of the return-to-base module. Everything here can be tested
//! on host without any feature flags or embassy dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies, no heap
//! - **Trait abstractions**: Distance metrics injected via `DistanceStrategy`
//!
//! # Modules
//!
//! - [`navigation`]: Waypoint path, geometry strategies, recorder, and guide
//! - [`mode`]: Mode state machine and status snapshot
//! - [`parameters`]: Runtime parameter store and RTB parameter definitions
//! - [`error`]: Error kinds reported through the status

#![no_std]

pub mod error;
pub mod mode;
pub mod navigation;
pub mod parameters;

pub use error::RtbError;
pub use mode::{ReturnToBase, RtbMode, RtbStatus};
pub use navigation::{Kinematics, Position, RtbConfig};
