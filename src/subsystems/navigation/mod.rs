//! Navigation subsystem
//!
//! Wraps the pure return-to-base controller from `rtb_core` for use from
//! tasks:
//! - [`rtb::RtbHandle`]: logged entry points over any [`SharedState`]
//! - `rtb::RTB`: global controller (feature `embassy`)
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────┐   set_mode()   ┌─────────────────────────┐
//! │ arming / mode handlers │ ─────────────► │                         │
//! └────────────────────────┘                │  RtbHandle<S>           │
//! ┌────────────────────────┐   update()     │    S: SharedState<      │
//! │ navigation task (tick) │ ─────────────► │       ReturnToBase>     │
//! └────────────────────────┘                │                         │
//! ┌────────────────────────┐   status()     │  logs every transition  │
//! │ telemetry              │ ◄───────────── │                         │
//! └────────────────────────┘                └─────────────────────────┘
//! ```
//!
//! [`SharedState`]: crate::core::traits::SharedState

pub mod rtb;

pub use rtb::RtbHandle;

#[cfg(feature = "embassy")]
pub use rtb::RTB;
