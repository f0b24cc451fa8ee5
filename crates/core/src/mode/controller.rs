//! Return-to-base mode controller
//!
//! Owns the waypoint path and selects which of the recorder or guide sees
//! each tick.
//!
//! # Transitions
//!
//! ```text
//! Disabled  --set_mode(Recording)--> Recording   path cleared
//! Recording --set_mode(Tracking)---> Tracking    path frozen, guide starts at tail
//! Recording --set_mode(Disabled)---> Disabled    path discarded
//! Tracking  --set_mode(Disabled)---> Disabled    guidance aborted, path discarded
//! Tracking  --path exhausted-------> Disabled    automatic, status.path_exhausted
//! ```
//!
//! Every other request is either a same-mode no-op or rejected with
//! [`RtbError::InvalidModeTransition`]. Requesting `Tracking` with nothing
//! recorded leaves the module `Disabled`.

use crate::error::RtbError;
use crate::navigation::{
    DistanceStrategy, Geometry, Guide, GuideOutcome, Kinematics, Position, RecordOutcome,
    Recorder, ReturnPathIter, RtbConfig, Waypoint, WaypointPath, RTB_POINTS_MAX,
};

use super::state::{RtbCounters, RtbEvent, RtbMode, RtbStatus};

const IDLE_STATUS: RtbStatus = RtbStatus {
    mode: RtbMode::Disabled,
    target: None,
    distance_to_target: 0.0,
    bearing_to_target: 0.0,
    distance_to_home: 0.0,
    path_len: 0,
    path_exhausted: false,
    storage_exhausted: false,
    last_error: None,
    event: RtbEvent::Idle,
    counters: RtbCounters {
        recorded: 0,
        dropped: 0,
        compactions: 0,
        reached: 0,
    },
};

/// Return-to-base controller
///
/// Created by the host and passed to every operation; there is no hidden
/// global state. `N` is the waypoint capacity.
pub struct ReturnToBase<const N: usize = RTB_POINTS_MAX> {
    config: RtbConfig,
    geometry: Geometry,
    mode: RtbMode,
    path: WaypointPath<N>,
    recorder: Recorder,
    guide: Guide,
    status: RtbStatus,
}

impl<const N: usize> Default for ReturnToBase<N> {
    fn default() -> Self {
        Self::new(RtbConfig::DEFAULT)
    }
}

impl<const N: usize> ReturnToBase<N> {
    /// Create a disabled controller (const fn for static initialization)
    ///
    /// The configuration is not validated here; use [`init`](Self::init) or
    /// [`configure`](Self::configure) for untrusted values.
    pub const fn new(config: RtbConfig) -> Self {
        Self {
            geometry: Geometry::new(config.geometry, config.planet_radius_km),
            config,
            mode: RtbMode::Disabled,
            path: WaypointPath::new(),
            recorder: Recorder::new(),
            guide: Guide::new(),
            status: IDLE_STATUS,
        }
    }

    /// Reset to a known disabled state with `config`
    ///
    /// Safe to call more than once. An invalid configuration still resets
    /// the module but keeps the previous configuration.
    pub fn init(&mut self, config: RtbConfig) -> Result<(), RtbError> {
        let valid = config.is_valid();
        if valid {
            self.apply_config(config);
        }

        self.mode = RtbMode::Disabled;
        self.path.clear();
        self.recorder.reset();
        self.guide.reset();
        self.status = IDLE_STATUS;

        if valid {
            Ok(())
        } else {
            self.status.last_error = Some(RtbError::InvalidConfig);
            Err(RtbError::InvalidConfig)
        }
    }

    /// Replace the configuration
    ///
    /// Only allowed while disabled, since recorded distances depend on it.
    pub fn configure(&mut self, config: RtbConfig) -> Result<(), RtbError> {
        if self.mode != RtbMode::Disabled || !config.is_valid() {
            self.status.last_error = Some(RtbError::InvalidConfig);
            return Err(RtbError::InvalidConfig);
        }
        self.apply_config(config);
        Ok(())
    }

    /// Request a mode change
    ///
    /// Returns the mode in effect after the request.
    pub fn set_mode(&mut self, requested: RtbMode) -> Result<RtbMode, RtbError> {
        let result = match (self.mode, requested) {
            (RtbMode::Disabled, RtbMode::Disabled)
            | (RtbMode::Recording, RtbMode::Recording)
            | (RtbMode::Tracking, RtbMode::Tracking) => Ok(requested),
            (_, RtbMode::Disabled) => {
                self.enter_disabled();
                Ok(RtbMode::Disabled)
            }
            (RtbMode::Disabled, RtbMode::Recording) => {
                self.enter_recording();
                Ok(RtbMode::Recording)
            }
            (RtbMode::Recording, RtbMode::Tracking) => {
                if self.path.is_empty() {
                    self.enter_disabled();
                    Err(RtbError::InvalidModeTransition)
                } else {
                    self.enter_tracking();
                    Ok(RtbMode::Tracking)
                }
            }
            (RtbMode::Disabled, RtbMode::Tracking) | (RtbMode::Tracking, RtbMode::Recording) => {
                Err(RtbError::InvalidModeTransition)
            }
        };

        if let Err(e) = result {
            self.status.last_error = Some(e);
        }
        self.sync_status(None);
        result
    }

    /// Per-tick entry point
    ///
    /// Never fails; problems are reported through the returned status.
    /// While disabled this is a single mode check.
    pub fn update(&mut self, position: Position, kinematics: Kinematics) -> RtbStatus {
        match self.mode {
            RtbMode::Disabled => {
                self.status.event = RtbEvent::Idle;
                return self.status;
            }
            RtbMode::Recording => {
                let outcome = self.recorder.record(
                    &mut self.path,
                    &self.geometry,
                    &self.config,
                    position,
                    &kinematics,
                );
                if outcome == RecordOutcome::Refused {
                    self.status.storage_exhausted = true;
                    self.status.last_error = Some(RtbError::StorageExhausted);
                }
                self.status.event = RtbEvent::Record(outcome);
            }
            RtbMode::Tracking => {
                let outcome =
                    self.guide
                        .update(&mut self.path, &self.geometry, &self.config, position);
                if outcome == GuideOutcome::Exhausted {
                    self.mode = RtbMode::Disabled;
                    self.path.clear();
                    self.status.path_exhausted = true;
                    self.status.last_error = Some(RtbError::PathExhausted);
                }
                self.status.event = RtbEvent::Guide(outcome);
            }
        }

        self.sync_status(Some(&position));
        self.status
    }

    /// Current status (authoritative)
    pub fn status(&self) -> RtbStatus {
        self.status
    }

    /// Current mode
    pub fn mode(&self) -> RtbMode {
        self.mode
    }

    /// Active configuration
    pub fn config(&self) -> &RtbConfig {
        &self.config
    }

    /// Number of stored waypoints
    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    /// Waypoint capacity
    pub fn capacity(&self) -> usize {
        self.path.capacity()
    }

    /// Copy of the waypoint at `index` (0 = origin)
    pub fn waypoint(&self, index: usize) -> Option<Waypoint> {
        self.path.get(index).copied()
    }

    /// Copies of the stored waypoints, origin first
    pub fn waypoints(&self) -> impl Iterator<Item = Waypoint> + '_ {
        self.path.iter().copied()
    }

    /// Positions from the current target back to the origin
    pub fn return_path(&self) -> ReturnPathIter<'_> {
        self.path.return_path()
    }

    fn apply_config(&mut self, config: RtbConfig) {
        self.config = config;
        self.geometry = Geometry::new(config.geometry, config.planet_radius_km);
    }

    fn enter_disabled(&mut self) {
        self.mode = RtbMode::Disabled;
        self.path.clear();
    }

    fn enter_recording(&mut self) {
        self.mode = RtbMode::Recording;
        self.path.clear();
        self.recorder.reset();
        self.guide.reset();
        self.status.path_exhausted = false;
        self.status.storage_exhausted = false;
        self.status.last_error = None;
    }

    fn enter_tracking(&mut self) {
        self.mode = RtbMode::Tracking;
        self.guide.reset();
        self.status.path_exhausted = false;
    }

    /// Refresh the derived status fields from the controller state
    fn sync_status(&mut self, position: Option<&Position>) {
        let stats = self.recorder.stats();
        let status = &mut self.status;

        status.mode = self.mode;
        status.path_len = self.path.len();
        status.counters = RtbCounters {
            recorded: stats.recorded,
            dropped: stats.dropped,
            compactions: stats.compactions,
            reached: self.guide.reached(),
        };

        if self.mode != RtbMode::Tracking {
            status.target = None;
            status.distance_to_target = 0.0;
            status.bearing_to_target = 0.0;
            status.distance_to_home = 0.0;
            return;
        }

        let target = self.path.tail().map(|wp| wp.position);
        status.target = target;
        status.distance_to_home = self.guide.distance_to_home();
        if let (Some(target), Some(position)) = (target, position) {
            if position.is_finite() {
                status.distance_to_target = self.geometry.distance(position, &target);
                status.bearing_to_target = self.geometry.bearing(position, &target);
            }
        }
    }
}
