//! Core infrastructure
//!
//! Logging macros and the synchronized-state abstraction shared by the
//! subsystems.

pub mod logging;
pub mod traits;
