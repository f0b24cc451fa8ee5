//! Mode state types
//!
//! Operating mode and the status snapshot handed to the host every tick.

use crate::error::RtbError;
use crate::navigation::{GuideOutcome, Position, RecordOutcome};

/// Return-to-base operating mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RtbMode {
    /// Idle, updates are no-ops
    #[default]
    Disabled,
    /// Sampling the outbound path
    Recording,
    /// Guiding the vehicle back along the recorded path
    Tracking,
}

impl RtbMode {
    /// Return mode name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            RtbMode::Disabled => "Disabled",
            RtbMode::Recording => "Recording",
            RtbMode::Tracking => "Tracking",
        }
    }
}

/// What the last tick did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RtbEvent {
    /// Nothing ran (disabled)
    #[default]
    Idle,
    /// Recorder ran
    Record(RecordOutcome),
    /// Guide ran
    Guide(GuideOutcome),
}

/// Cumulative counters for telemetry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RtbCounters {
    /// Waypoints stored during the current recording
    pub recorded: u32,
    /// Samples dropped because storage was exhausted
    pub dropped: u32,
    /// Loop compactions performed
    pub compactions: u32,
    /// Waypoints reached during guidance
    pub reached: u32,
}

/// Status snapshot
///
/// Returned by value; never references internal waypoints.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RtbStatus {
    /// Current mode
    pub mode: RtbMode,
    /// Current guidance target (tracking only)
    pub target: Option<Position>,
    /// Straight-line distance to the target in meters
    pub distance_to_target: f32,
    /// Bearing to the target in degrees (0-360)
    pub bearing_to_target: f32,
    /// Along-path distance home as of the last refresh in meters
    pub distance_to_home: f32,
    /// Waypoints currently stored
    pub path_len: usize,
    /// Guidance consumed the whole path (latched until recording restarts)
    pub path_exhausted: bool,
    /// Recording dropped samples for lack of storage (latched per session)
    pub storage_exhausted: bool,
    /// Most recent error reported by a tick or request
    pub last_error: Option<RtbError>,
    /// What the last tick did
    pub event: RtbEvent,
    /// Telemetry counters
    pub counters: RtbCounters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_default() {
        assert_eq!(RtbMode::default(), RtbMode::Disabled);
    }

    #[test]
    fn test_mode_as_str() {
        assert_eq!(RtbMode::Disabled.as_str(), "Disabled");
        assert_eq!(RtbMode::Recording.as_str(), "Recording");
        assert_eq!(RtbMode::Tracking.as_str(), "Tracking");
    }

    #[test]
    fn test_status_default() {
        let status = RtbStatus::default();
        assert_eq!(status.mode, RtbMode::Disabled);
        assert!(status.target.is_none());
        assert!(!status.path_exhausted);
        assert!(!status.storage_exhausted);
        assert!(status.last_error.is_none());
        assert_eq!(status.event, RtbEvent::Idle);
        assert_eq!(status.path_len, 0);
    }
}
