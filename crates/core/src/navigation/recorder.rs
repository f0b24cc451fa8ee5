//! Path recorder
//!
//! Samples the outbound route into a [`WaypointPath`] while the module is
//! recording. A new waypoint is stored only once the vehicle has moved at
//! least the adaptive threshold away from the last one: straight, slow
//! travel is stored sparsely, turns and fast travel densely.
//!
//! # Loop compaction
//!
//! When a sample lands within `flush_dist` of an earlier waypoint, the loop
//! between that waypoint and the sample is collapsed so the return trip does
//! not re-traverse it. Only the most recent matching waypoint is used, and
//! loops whose opening is wider than `flush_dist` are not detected. A match
//! on the tail itself closes nothing and the sample is appended as usual.
//!
//! # Storage exhaustion
//!
//! The origin is never dropped. Depending on [`OverflowPolicy`] the sample
//! is either refused or an interior waypoint is recycled to make room.

use libm::{fabsf, powf};

use super::geo::DistanceStrategy;
use super::path::WaypointPath;
use super::types::{Kinematics, OverflowPolicy, Position, RtbConfig, Waypoint};

/// Result of feeding one sample to the recorder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First waypoint (origin) stored
    Started,
    /// Sample too close to the tail (or not finite), nothing stored
    Discarded,
    /// Sample appended at the tail
    Appended,
    /// Loop collapsed back to an earlier waypoint
    Compacted {
        /// Waypoints removed between the matched waypoint and the sample
        removed: usize,
    },
    /// Buffer was full; an interior waypoint was recycled for the sample
    Recycled,
    /// Buffer was full and no room could be made; sample dropped
    Refused,
}

/// Recording counters for telemetry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecorderStats {
    /// Waypoints stored (including the origin)
    pub recorded: u32,
    /// Samples dropped because the buffer was full
    pub dropped: u32,
    /// Loop compactions performed
    pub compactions: u32,
}

/// Outbound path recorder
#[derive(Clone, Copy, Debug, Default)]
pub struct Recorder {
    stats: RecorderStats,
}

impl Recorder {
    /// Create a new recorder (const fn for static initialization)
    pub const fn new() -> Self {
        Self {
            stats: RecorderStats {
                recorded: 0,
                dropped: 0,
                compactions: 0,
            },
        }
    }

    /// Reset counters for a new recording session
    pub fn reset(&mut self) {
        self.stats = RecorderStats::default();
    }

    /// Recording counters
    pub fn stats(&self) -> RecorderStats {
        self.stats
    }

    /// Feed one position sample
    pub fn record<S: DistanceStrategy, const N: usize>(
        &mut self,
        path: &mut WaypointPath<N>,
        geo: &S,
        config: &RtbConfig,
        position: Position,
        kinematics: &Kinematics,
    ) -> RecordOutcome {
        if !position.is_finite() {
            return RecordOutcome::Discarded;
        }

        let Some(tail) = path.tail().copied() else {
            return match path.push(Waypoint::new(position, 0.0)) {
                Ok(()) => {
                    self.stats.recorded = self.stats.recorded.saturating_add(1);
                    RecordOutcome::Started
                }
                Err(_) => {
                    self.stats.dropped = self.stats.dropped.saturating_add(1);
                    RecordOutcome::Refused
                }
            };
        };

        let distance = geo.distance(&position, &tail.position);
        if distance < adaptive_threshold(config, kinematics) {
            return RecordOutcome::Discarded;
        }

        // A match on the current tail closes nothing; the sample is appended
        let closure = find_loop_closure(path, geo, config, &position)
            .filter(|&index| index + 1 < path.len());
        if let Some(index) = closure {
            let removed = collapse_loop(path, geo, index, position);
            self.stats.compactions = self.stats.compactions.saturating_add(1);
            self.stats.recorded = self.stats.recorded.saturating_add(1);
            return RecordOutcome::Compacted { removed };
        }

        let mut outcome = RecordOutcome::Appended;
        if path.is_full() {
            let recycled = match config.overflow {
                OverflowPolicy::Refuse => false,
                OverflowPolicy::RecycleInterior => recycle_interior(path, geo, config),
            };
            if !recycled {
                self.stats.dropped = self.stats.dropped.saturating_add(1);
                return RecordOutcome::Refused;
            }
            outcome = RecordOutcome::Recycled;
        }

        // Recycling may have shortened the tail's cumulative distance
        let base = path.tail().map_or(0.0, |wp| wp.distance_from_start);
        match path.push(Waypoint::new(position, base + distance)) {
            Ok(()) => {
                self.stats.recorded = self.stats.recorded.saturating_add(1);
                outcome
            }
            Err(_) => {
                self.stats.dropped = self.stats.dropped.saturating_add(1);
                RecordOutcome::Refused
            }
        }
    }
}

/// Minimum distance from the tail before a sample is stored
///
/// Longitudinal speed, normalized between `min_speed` and `max_speed`,
/// interpolates from `min_waypoint_dist` (slow) up to `save_dist` (fast).
/// Turn rate, normalized against `max_angular_speed` and raised to
/// `angular_sensitivity`, scales the result down toward zero. The result is
/// never below `min_waypoint_dist`.
pub fn adaptive_threshold(config: &RtbConfig, kinematics: &Kinematics) -> f32 {
    let mut threshold = config.save_dist;

    if config.adaptive_longitudinal {
        let speed = normalize(
            fabsf(kinematics.longitudinal_speed),
            config.min_speed,
            config.max_speed,
        );
        threshold = config.min_waypoint_dist + (config.save_dist - config.min_waypoint_dist) * speed;
    }

    if config.adaptive_angular {
        let turn = normalize(
            fabsf(kinematics.angular_speed),
            0.0,
            config.max_angular_speed,
        );
        threshold *= 1.0 - powf(turn, config.angular_sensitivity as f32);
    }

    // f32::max drops NaN, so a bad kinematics sample degrades to densest sampling
    threshold.max(config.min_waypoint_dist)
}

/// Map `value` from `[lo, hi]` onto `[0, 1]`
fn normalize(value: f32, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return 1.0;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Most recent waypoint within `flush_dist` of `position`
///
/// The scan starts at the current tail and stops at the first match.
fn find_loop_closure<S: DistanceStrategy, const N: usize>(
    path: &WaypointPath<N>,
    geo: &S,
    config: &RtbConfig,
    position: &Position,
) -> Option<usize> {
    (0..path.len()).rev().find(|&i| {
        path.get(i)
            .is_some_and(|wp| geo.distance(position, &wp.position) < config.flush_dist)
    })
}

/// Drop everything after `index` and close the loop at `position`
///
/// The matched waypoint and the sample are both kept, so the closing pair
/// may sit closer than `min_waypoint_dist`. Returns the number of
/// waypoints removed.
fn collapse_loop<S: DistanceStrategy, const N: usize>(
    path: &mut WaypointPath<N>,
    geo: &S,
    index: usize,
    position: Position,
) -> usize {
    let removed = path.truncate_after(index);

    if let Some(anchor) = path.tail().copied() {
        let gap = geo.distance(&anchor.position, &position);
        // Truncation freed at least one slot
        let _ = path.push(Waypoint::new(position, anchor.distance_from_start + gap));
    }

    removed
}

/// Remove the interior waypoint that contributes the smallest detour
///
/// Head and tail are never candidates. A waypoint qualifies only if its
/// neighbours stay at least `min_waypoint_dist` apart once it is gone.
fn recycle_interior<S: DistanceStrategy, const N: usize>(
    path: &mut WaypointPath<N>,
    geo: &S,
    config: &RtbConfig,
) -> bool {
    let mut best: Option<(usize, f32)> = None;

    for i in 1..path.len().saturating_sub(1) {
        let (Some(prev), Some(cur), Some(next)) = (path.get(i - 1), path.get(i), path.get(i + 1))
        else {
            continue;
        };
        let bridge = geo.distance(&prev.position, &next.position);
        if bridge < config.min_waypoint_dist {
            continue;
        }
        let detour = geo.distance(&prev.position, &cur.position)
            + geo.distance(&cur.position, &next.position)
            - bridge;
        if best.map_or(true, |(_, d)| detour < d) {
            best = Some((i, detour));
        }
    }

    let Some((index, detour)) = best else {
        return false;
    };
    path.remove(index);
    path.shorten_from(index, detour.max(0.0));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::geo::Planar;

    fn fixed_config() -> RtbConfig {
        RtbConfig {
            adaptive_longitudinal: false,
            adaptive_angular: false,
            ..RtbConfig::DEFAULT
        }
    }

    fn still() -> Kinematics {
        Kinematics::new(0.0, 0.0)
    }

    fn record_all<const N: usize>(
        recorder: &mut Recorder,
        path: &mut WaypointPath<N>,
        config: &RtbConfig,
        points: &[(f64, f64)],
    ) {
        for &(x, y) in points {
            recorder.record(path, &Planar, config, Position::new(x, y), &still());
        }
    }

    #[test]
    fn test_threshold_fixed_when_adaptive_disabled() {
        let config = fixed_config();
        let t = adaptive_threshold(&config, &Kinematics::new(1.5, 0.7));
        assert!((t - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_grows_with_speed() {
        let config = RtbConfig {
            adaptive_angular: false,
            ..RtbConfig::DEFAULT
        };
        let slow = adaptive_threshold(&config, &Kinematics::new(0.2, 0.0));
        let mid = adaptive_threshold(&config, &Kinematics::new(1.1, 0.0));
        let fast = adaptive_threshold(&config, &Kinematics::new(2.0, 0.0));
        assert!((slow - 1.0).abs() < 1e-5);
        assert!((mid - 5.5).abs() < 1e-4);
        assert!((fast - 10.0).abs() < 1e-5);

        // Above max speed clamps to the base threshold
        let faster = adaptive_threshold(&config, &Kinematics::new(5.0, 0.0));
        assert!((faster - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_threshold_shrinks_with_turn_rate() {
        let config = RtbConfig {
            adaptive_longitudinal: false,
            ..RtbConfig::DEFAULT
        };
        let straight = adaptive_threshold(&config, &Kinematics::new(1.0, 0.0));
        let turning = adaptive_threshold(&config, &Kinematics::new(1.0, 0.4));
        let spinning = adaptive_threshold(&config, &Kinematics::new(1.0, -0.8));
        assert!((straight - 10.0).abs() < 1e-5);
        // (0.4 / 0.8)^2 = 0.25
        assert!((turning - 7.5).abs() < 1e-4);
        // Full turn rate would reach zero, clamped to minimum separation
        assert!((spinning - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_threshold_never_below_min_separation() {
        let config = RtbConfig::DEFAULT;
        for &(v, w) in &[(0.0, 0.0), (0.0, 10.0), (2.0, 0.79), (f32::NAN, 0.1)] {
            let t = adaptive_threshold(&config, &Kinematics::new(v, w));
            assert!(t >= config.min_waypoint_dist, "v={} w={} t={}", v, w, t);
        }
    }

    #[test]
    fn test_first_sample_starts_path() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<16> = WaypointPath::new();
        let outcome = recorder.record(
            &mut path,
            &Planar,
            &fixed_config(),
            Position::new(3.0, 4.0),
            &still(),
        );
        assert_eq!(outcome, RecordOutcome::Started);
        assert_eq!(path.len(), 1);
        assert!(path.head().unwrap().distance_from_start.abs() < 1e-6);
    }

    #[test]
    fn test_close_sample_discarded() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<16> = WaypointPath::new();
        let config = fixed_config();
        record_all(&mut recorder, &mut path, &config, &[(0.0, 0.0)]);

        let outcome = recorder.record(&mut path, &Planar, &config, Position::new(9.9, 0.0), &still());
        assert_eq!(outcome, RecordOutcome::Discarded);
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_sample_at_threshold_appended() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<16> = WaypointPath::new();
        let config = fixed_config();
        record_all(&mut recorder, &mut path, &config, &[(0.0, 0.0)]);

        let outcome = recorder.record(&mut path, &Planar, &config, Position::new(10.0, 0.0), &still());
        assert_eq!(outcome, RecordOutcome::Appended);
        assert!((path.tail().unwrap().distance_from_start - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_non_finite_sample_discarded() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<16> = WaypointPath::new();
        let outcome = recorder.record(
            &mut path,
            &Planar,
            &fixed_config(),
            Position::new(f64::NAN, 0.0),
            &still(),
        );
        assert_eq!(outcome, RecordOutcome::Discarded);
        assert!(path.is_empty());
    }

    #[test]
    fn test_cumulative_distance_accumulates() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<16> = WaypointPath::new();
        let config = fixed_config();
        record_all(
            &mut recorder,
            &mut path,
            &config,
            &[(0.0, 0.0), (15.0, 0.0), (15.0, 20.0)],
        );
        assert_eq!(path.len(), 3);
        assert!((path.get(1).unwrap().distance_from_start - 15.0).abs() < 1e-5);
        assert!((path.get(2).unwrap().distance_from_start - 35.0).abs() < 1e-5);
        assert_eq!(recorder.stats().recorded, 3);
    }

    #[test]
    fn test_loop_collapses_to_matched_waypoint() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<16> = WaypointPath::new();
        let config = fixed_config();
        record_all(
            &mut recorder,
            &mut path,
            &config,
            &[(0.0, 0.0), (20.0, 0.0), (40.0, 0.0), (40.0, 20.0), (20.0, 20.0)],
        );
        assert_eq!(path.len(), 5);

        // Back within 0.5 m of (20, 0): matched waypoint and sample both kept
        let outcome = recorder.record(&mut path, &Planar, &config, Position::new(20.0, 0.5), &still());
        assert_eq!(outcome, RecordOutcome::Compacted { removed: 3 });
        assert_eq!(path.len(), 3);
        let anchor = path.get(1).unwrap();
        assert!((anchor.position.x - 20.0).abs() < 1e-9);
        assert!(anchor.position.y.abs() < 1e-9);
        let tail = path.tail().unwrap();
        assert!((tail.position.y - 0.5).abs() < 1e-9);
        assert!((tail.distance_from_start - 20.5).abs() < 1e-4);
        assert_eq!(recorder.stats().compactions, 1);
    }

    #[test]
    fn test_loop_keeps_sample_when_separated_from_match() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<16> = WaypointPath::new();
        let config = RtbConfig {
            flush_dist: 3.0,
            ..fixed_config()
        };
        record_all(
            &mut recorder,
            &mut path,
            &config,
            &[(0.0, 0.0), (20.0, 0.0), (40.0, 0.0), (40.0, 20.0)],
        );

        // 2 m from (20, 0)
        let outcome = recorder.record(&mut path, &Planar, &config, Position::new(20.0, 2.0), &still());
        assert_eq!(outcome, RecordOutcome::Compacted { removed: 2 });
        assert_eq!(path.len(), 3);
        let tail = path.tail().unwrap();
        assert!((tail.position.y - 2.0).abs() < 1e-9);
        assert!((tail.distance_from_start - 22.0).abs() < 1e-4);
    }

    #[test]
    fn test_match_on_tail_stops_scan_and_appends() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<16> = WaypointPath::new();
        let config = RtbConfig {
            flush_dist: 3.0,
            save_dist: 1.0,
            min_waypoint_dist: 1.0,
            ..fixed_config()
        };
        record_all(&mut recorder, &mut path, &config, &[(0.0, 0.0), (1.5, 0.0)]);
        assert_eq!(path.len(), 2);

        // Within flush_dist of both (1.5, 0) and (0, 0); the tail matches first
        let outcome = recorder.record(&mut path, &Planar, &config, Position::new(1.2, 1.2), &still());
        assert_eq!(outcome, RecordOutcome::Appended);
        assert_eq!(path.len(), 3);

        let points: heapless::Vec<(f64, f64), 3> =
            path.iter().map(|w| (w.position.x, w.position.y)).collect();
        assert_eq!(points.as_slice(), &[(0.0, 0.0), (1.5, 0.0), (1.2, 1.2)]);
        assert_eq!(recorder.stats().compactions, 0);
    }

    #[test]
    fn test_counters_saturate() {
        let mut recorder = Recorder::new();
        recorder.stats.dropped = u32::MAX;
        let mut path: WaypointPath<1> = WaypointPath::new();
        let config = fixed_config();
        record_all(&mut recorder, &mut path, &config, &[(0.0, 0.0), (10.0, 0.0)]);

        assert_eq!(path.len(), 1);
        assert_eq!(recorder.stats().dropped, u32::MAX);
    }

    #[test]
    fn test_refuse_policy_keeps_origin() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<3> = WaypointPath::new();
        let config = fixed_config();
        record_all(
            &mut recorder,
            &mut path,
            &config,
            &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)],
        );
        assert!(path.is_full());

        let outcome = recorder.record(&mut path, &Planar, &config, Position::new(30.0, 0.0), &still());
        assert_eq!(outcome, RecordOutcome::Refused);
        assert_eq!(path.len(), 3);
        assert!(path.head().unwrap().position.x.abs() < 1e-9);
        assert!((path.tail().unwrap().position.x - 20.0).abs() < 1e-9);
        assert_eq!(recorder.stats().dropped, 1);
    }

    #[test]
    fn test_recycle_policy_drops_straightest_interior() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<4> = WaypointPath::new();
        let config = RtbConfig {
            overflow: OverflowPolicy::RecycleInterior,
            ..fixed_config()
        };
        // (10, 0) is collinear, (20, 10) is a corner
        record_all(
            &mut recorder,
            &mut path,
            &config,
            &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (20.0, 10.0)],
        );
        assert!(path.is_full());

        let outcome = recorder.record(&mut path, &Planar, &config, Position::new(20.0, 20.0), &still());
        assert_eq!(outcome, RecordOutcome::Recycled);
        assert_eq!(path.len(), 4);

        let xs: heapless::Vec<(f64, f64), 4> = path.iter().map(|w| (w.position.x, w.position.y)).collect();
        assert_eq!(xs.as_slice(), &[(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (20.0, 20.0)]);

        // Straight-line removal leaves cumulative distances unchanged
        assert!((path.get(1).unwrap().distance_from_start - 20.0).abs() < 1e-4);
        assert!((path.tail().unwrap().distance_from_start - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_recycle_policy_refuses_without_interior() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<2> = WaypointPath::new();
        let config = RtbConfig {
            overflow: OverflowPolicy::RecycleInterior,
            ..fixed_config()
        };
        record_all(&mut recorder, &mut path, &config, &[(0.0, 0.0), (10.0, 0.0)]);

        let outcome = recorder.record(&mut path, &Planar, &config, Position::new(20.0, 0.0), &still());
        assert_eq!(outcome, RecordOutcome::Refused);
        assert!(path.head().unwrap().position.x.abs() < 1e-9);
    }

    #[test]
    fn test_compaction_frees_room_when_full() {
        let mut recorder = Recorder::new();
        let mut path: WaypointPath<4> = WaypointPath::new();
        let config = fixed_config();
        record_all(
            &mut recorder,
            &mut path,
            &config,
            &[(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 20.0)],
        );
        assert!(path.is_full());

        let outcome = recorder.record(&mut path, &Planar, &config, Position::new(0.3, 0.0), &still());
        assert_eq!(outcome, RecordOutcome::Compacted { removed: 3 });
        assert_eq!(path.len(), 2);
        assert!((path.tail().unwrap().position.x - 0.3).abs() < 1e-9);
        assert_eq!(recorder.stats().dropped, 0);
    }
}
