//! Return-to-base mode state machine
//!
//! This module provides the top-level controller that owns the waypoint
//! path and dispatches each tick to the recorder or the guide.
//!
//! # Contents
//!
//! - `RtbMode` / `RtbStatus` state and status types
//! - `ReturnToBase` controller (mode transitions, per-tick update)

mod controller;
mod state;

pub use controller::ReturnToBase;
pub use state::{RtbCounters, RtbEvent, RtbMode, RtbStatus};
