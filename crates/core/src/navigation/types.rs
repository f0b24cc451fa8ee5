//! Navigation type definitions
//!
//! This module contains core types used by the return-to-base subsystem:
//! - `Position`: Planar (x, y) or geographic (lon, lat) coordinates
//! - `Kinematics`: Per-tick speed sample supplied by the host
//! - `Waypoint`: Recorded position plus cumulative path distance
//! - `RtbConfig`: Tuning constants for recording and guidance

use super::geo::CoordinateMode;

/// Vehicle position
///
/// Interpretation depends on the configured [`CoordinateMode`]:
/// - `Euclidean`: `x`/`y` in meters on a local plane
/// - `LatLon`: `x` is longitude, `y` is latitude, both in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// X coordinate (meters) or longitude (degrees)
    pub x: f64,
    /// Y coordinate (meters) or latitude (degrees)
    pub y: f64,
}

impl Position {
    /// Create a new position from raw coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a geographic position
    pub const fn from_lat_lon(latitude: f64, longitude: f64) -> Self {
        Self {
            x: longitude,
            y: latitude,
        }
    }

    /// Latitude in degrees (geographic mode)
    pub fn latitude(&self) -> f64 {
        self.y
    }

    /// Longitude in degrees (geographic mode)
    pub fn longitude(&self) -> f64 {
        self.x
    }

    /// True if both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Kinematics sample for one control tick
///
/// Consumed immediately, never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Kinematics {
    /// Longitudinal speed in m/s (sign ignored)
    pub longitudinal_speed: f32,
    /// Angular (yaw) rate in rad/s (sign ignored)
    pub angular_speed: f32,
}

impl Kinematics {
    /// Create a new kinematics sample
    pub const fn new(longitudinal_speed: f32, angular_speed: f32) -> Self {
        Self {
            longitudinal_speed,
            angular_speed,
        }
    }
}

/// Recorded waypoint
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Waypoint {
    /// Recorded position
    pub position: Position,
    /// Cumulative path length from the origin in meters
    ///
    /// During guidance this is rewritten by the periodic refresh to the
    /// along-path distance from the vehicle.
    pub distance_from_start: f32,
}

impl Waypoint {
    /// Create a new waypoint
    pub const fn new(position: Position, distance_from_start: f32) -> Self {
        Self {
            position,
            distance_from_start,
        }
    }
}

/// What to do when a sample must be stored but the waypoint buffer is full
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the new sample; the stored path stays connected to the origin
    #[default]
    Refuse,
    /// Recycle the interior waypoint whose removal shortens the path least
    RecycleInterior,
}

impl OverflowPolicy {
    /// Decode from a parameter value (0 = refuse, 1 = recycle)
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(OverflowPolicy::Refuse),
            1 => Some(OverflowPolicy::RecycleInterior),
            _ => None,
        }
    }

    /// Encode as a parameter value
    pub fn as_i32(&self) -> i32 {
        match self {
            OverflowPolicy::Refuse => 0,
            OverflowPolicy::RecycleInterior => 1,
        }
    }
}

/// Return-to-base configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RtbConfig {
    /// Coordinate interpretation and distance formula
    pub geometry: CoordinateMode,
    /// Base waypoint saving distance in meters
    pub save_dist: f32,
    /// Scale the saving distance with longitudinal speed
    pub adaptive_longitudinal: bool,
    /// Shrink the saving distance while turning
    pub adaptive_angular: bool,
    /// Maximum vehicle speed in m/s (normalization bound)
    pub max_speed: f32,
    /// Minimum vehicle speed in m/s (normalization bound)
    pub min_speed: f32,
    /// Exponent applied to the normalized turn rate
    pub angular_sensitivity: i32,
    /// Maximum turn rate in rad/s (normalization bound)
    pub max_angular_speed: f32,
    /// Loop-closure distance for path compaction in meters
    pub flush_dist: f32,
    /// Distance at which guidance switches to the next waypoint in meters
    pub guide_change_dist: f32,
    /// Ticks between whole-path distance refreshes during guidance
    pub guide_update_ticks: u16,
    /// Minimum separation between adjacent waypoints in meters
    pub min_waypoint_dist: f32,
    /// Planetary radius in kilometers (geographic mode)
    pub planet_radius_km: f32,
    /// Behavior when the waypoint buffer is full
    pub overflow: OverflowPolicy,
}

impl RtbConfig {
    /// Default configuration (const for static initialization)
    pub const DEFAULT: Self = Self {
        geometry: CoordinateMode::Euclidean,
        save_dist: 10.0,
        adaptive_longitudinal: true,
        adaptive_angular: true,
        max_speed: 2.0,
        min_speed: 0.2,
        angular_sensitivity: 2,
        max_angular_speed: 0.8,
        flush_dist: 1.0,
        guide_change_dist: 1.0,
        guide_update_ticks: 10,
        min_waypoint_dist: 1.0,
        planet_radius_km: 6371.0,
        overflow: OverflowPolicy::Refuse,
    };

    /// Validate ranges and cross-field consistency
    pub fn is_valid(&self) -> bool {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.save_dist) || !positive(self.min_waypoint_dist) {
            return false;
        }
        if self.min_waypoint_dist > self.save_dist {
            return false;
        }
        if !positive(self.max_speed) || !self.min_speed.is_finite() || self.min_speed < 0.0 {
            return false;
        }
        if self.min_speed >= self.max_speed {
            return false;
        }
        if !positive(self.max_angular_speed) || self.angular_sensitivity < 1 {
            return false;
        }
        if !self.flush_dist.is_finite() || self.flush_dist < 0.0 {
            return false;
        }
        if !positive(self.guide_change_dist) || self.guide_update_ticks == 0 {
            return false;
        }
        positive(self.planet_radius_km)
    }
}

impl Default for RtbConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
