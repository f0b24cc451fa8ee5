//! Return-to-base error types
//!
//! None of these abort the control loop. They are returned from mode
//! requests and configuration calls, and latched into [`RtbStatus`] when
//! they arise during a tick.
//!
//! [`RtbStatus`]: crate::mode::RtbStatus

/// Errors reported by the return-to-base module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtbError {
    /// Waypoint store is full and the overflow policy could not make room
    StorageExhausted,
    /// Guidance has no remaining target (vehicle is home)
    PathExhausted,
    /// Requested mode change has no meaning from the current mode
    InvalidModeTransition,
    /// Configuration rejected (out of range, or applied while active)
    InvalidConfig,
}

impl RtbError {
    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            RtbError::StorageExhausted => "StorageExhausted",
            RtbError::PathExhausted => "PathExhausted",
            RtbError::InvalidModeTransition => "InvalidModeTransition",
            RtbError::InvalidConfig => "InvalidConfig",
        }
    }
}

impl core::fmt::Display for RtbError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RtbError::StorageExhausted => write!(f, "waypoint storage exhausted"),
            RtbError::PathExhausted => write!(f, "return path exhausted"),
            RtbError::InvalidModeTransition => write!(f, "invalid mode transition"),
            RtbError::InvalidConfig => write!(f, "invalid configuration"),
        }
    }
}
