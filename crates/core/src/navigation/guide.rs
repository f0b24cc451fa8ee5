//! Return guidance
//!
//! Walks the recorded path backward. The current target is always the path
//! tail; once the vehicle is within `guide_change_dist` of it, the tail is
//! consumed and the previous waypoint becomes the target.
//!
//! Every `guide_update_ticks` ticks the remaining waypoints get their
//! `distance_from_start` rewritten to the along-path distance from the
//! vehicle, so the head carries the distance still to travel home. This is
//! the only O(path length) step and is amortized over the decimation period.
//! Advancement itself only looks at the target position.

use super::geo::DistanceStrategy;
use super::path::WaypointPath;
use super::types::{Position, RtbConfig};

/// Result of one guidance tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuideOutcome {
    /// Heading for the current target
    Approaching,
    /// Target reached and consumed
    Reached {
        /// Waypoints left after this one
        remaining: usize,
    },
    /// No target left; the vehicle is home
    Exhausted,
}

/// Waypoint-advance guide
#[derive(Clone, Copy, Debug, Default)]
pub struct Guide {
    /// Ticks since the last whole-path refresh
    ticks: u16,
    /// Along-path distance home at the last refresh (meters)
    distance_to_home: f32,
    /// Waypoints consumed since guidance started
    reached: u32,
}

impl Guide {
    /// Create a new guide (const fn for static initialization)
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            distance_to_home: 0.0,
            reached: 0,
        }
    }

    /// Reset for a new return trip
    ///
    /// The first tick after a reset always refreshes.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Along-path distance home as of the last refresh
    pub fn distance_to_home(&self) -> f32 {
        self.distance_to_home
    }

    /// Waypoints consumed since guidance started
    pub fn reached(&self) -> u32 {
        self.reached
    }

    /// Run one guidance tick at `position`
    ///
    /// Consumes at most one waypoint per tick, always the tail.
    pub fn update<S: DistanceStrategy, const N: usize>(
        &mut self,
        path: &mut WaypointPath<N>,
        geo: &S,
        config: &RtbConfig,
        position: Position,
    ) -> GuideOutcome {
        let Some(target) = path.tail().copied() else {
            self.distance_to_home = 0.0;
            return GuideOutcome::Exhausted;
        };

        // A bad fix must not consume waypoints
        if !position.is_finite() {
            return GuideOutcome::Approaching;
        }

        let mut outcome = GuideOutcome::Approaching;
        if geo.distance(&position, &target.position) <= config.guide_change_dist {
            path.pop();
            self.reached = self.reached.saturating_add(1);
            if path.is_empty() {
                self.distance_to_home = 0.0;
                return GuideOutcome::Exhausted;
            }
            outcome = GuideOutcome::Reached {
                remaining: path.len(),
            };
        }

        if self.ticks == 0 {
            self.distance_to_home = refresh_distances(path, geo, &position);
        }
        self.ticks += 1;
        if self.ticks >= config.guide_update_ticks.max(1) {
            self.ticks = 0;
        }

        outcome
    }
}

/// Rewrite `distance_from_start` as the along-path distance from `position`
///
/// The tail gets the straight distance to the vehicle; each earlier
/// waypoint adds the recorded segment leading to it, so values grow toward
/// the head. Returns the head's value.
pub fn refresh_distances<S: DistanceStrategy, const N: usize>(
    path: &mut WaypointPath<N>,
    geo: &S,
    position: &Position,
) -> f32 {
    let points = path.as_mut_slice();
    let Some(last) = points.len().checked_sub(1) else {
        return 0.0;
    };

    let mut along = geo.distance(position, &points[last].position);
    points[last].distance_from_start = along;
    for i in (0..last).rev() {
        along += geo.distance(&points[i].position, &points[i + 1].position);
        points[i].distance_from_start = along;
    }
    along
}
