//! Return-to-Base Parameter Definitions
//!
//! Maps every `RtbConfig` field to a parameter store entry so the module
//! can be tuned at runtime from a ground station.
//!
//! # Parameters
//!
//! - `RTB_GEO_MODE` - Coordinate mode (0 = Euclidean meters, 1 = lat/lon degrees)
//! - `RTB_SAVE_DIST` - Nominal waypoint spacing in meters
//! - `RTB_ADPT_LONG` - Enable speed-based spacing adaptation
//! - `RTB_ADPT_ANG` - Enable turn-rate-based spacing adaptation
//! - `RTB_SPD_MAX` - Speed at which spacing reaches `RTB_SAVE_DIST` (m/s)
//! - `RTB_SPD_MIN` - Speed at or below which spacing is minimal (m/s)
//! - `RTB_ANG_SENS` - Exponent of the turn-rate reduction
//! - `RTB_ANG_MAX` - Turn rate at which spacing is minimal (rad/s)
//! - `RTB_FLUSH_DIST` - Loop closure radius in meters (0 disables compaction)
//! - `RTB_WP_CHANGE` - Waypoint acceptance radius during return (meters)
//! - `RTB_UPD_TICKS` - Ticks between whole-path distance refreshes
//! - `RTB_WP_MIN_DIST` - Minimum waypoint separation in meters
//! - `RTB_EARTH_RAD` - Planet radius for lat/lon mode (kilometers)
//! - `RTB_OVF_POLICY` - Full buffer behavior (0 = refuse, 1 = recycle interior)

use super::error::ParameterError;
use super::storage::{ParamValue, ParameterStore};
use crate::navigation::{CoordinateMode, OverflowPolicy, RtbConfig};

// --- Defaults ---

const DEFAULT_GEO_MODE: i32 = 0;
const DEFAULT_SAVE_DIST: f32 = 10.0;
const DEFAULT_ADAPTIVE_LONGITUDINAL: bool = true;
const DEFAULT_ADAPTIVE_ANGULAR: bool = true;
const DEFAULT_MAX_SPEED: f32 = 2.0;
const DEFAULT_MIN_SPEED: f32 = 0.2;
const DEFAULT_ANGULAR_SENSITIVITY: i32 = 2;
const DEFAULT_MAX_ANGULAR_SPEED: f32 = 0.8;
const DEFAULT_FLUSH_DIST: f32 = 1.0;
const DEFAULT_GUIDE_CHANGE_DIST: f32 = 1.0;
const DEFAULT_GUIDE_UPDATE_TICKS: i32 = 10;
const DEFAULT_MIN_WAYPOINT_DIST: f32 = 1.0;
const DEFAULT_PLANET_RADIUS_KM: f32 = 6371.0;
const DEFAULT_OVERFLOW_POLICY: i32 = 0;

// --- Ranges ---

const MIN_GEO_MODE: i32 = 0;
const MAX_GEO_MODE: i32 = 1;

const MIN_SAVE_DIST: f32 = 1.0;
const MAX_SAVE_DIST: f32 = 1000.0;

const MIN_MAX_SPEED: f32 = 0.1;
const MAX_SPEED: f32 = 100.0;

const MIN_MIN_SPEED: f32 = 0.0;

const MIN_ANGULAR_SENSITIVITY: i32 = 1;
const MAX_ANGULAR_SENSITIVITY: i32 = 8;

const MIN_ANGULAR_SPEED: f32 = 0.01;
const MAX_ANGULAR_SPEED: f32 = 20.0;

const MIN_FLUSH_DIST: f32 = 0.0;
const MAX_FLUSH_DIST: f32 = 100.0;

const MIN_GUIDE_CHANGE_DIST: f32 = 0.1;
const MAX_GUIDE_CHANGE_DIST: f32 = 100.0;

const MIN_UPDATE_TICKS: i32 = 1;
const MAX_UPDATE_TICKS: i32 = 1000;

const MIN_WAYPOINT_DIST: f32 = 0.1;
const MAX_WAYPOINT_DIST: f32 = 1000.0;

const MIN_PLANET_RADIUS_KM: f32 = 1000.0;
const MAX_PLANET_RADIUS_KM: f32 = 100_000.0;

const MIN_OVERFLOW_POLICY: i32 = 0;
const MAX_OVERFLOW_POLICY: i32 = 1;

/// Return-to-base parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct RtbParams {
    /// Coordinate mode code (0 = Euclidean, 1 = lat/lon)
    pub geo_mode: i32,
    /// Nominal waypoint spacing (meters)
    pub save_dist: f32,
    /// Speed-based spacing adaptation
    pub adaptive_longitudinal: bool,
    /// Turn-rate-based spacing adaptation
    pub adaptive_angular: bool,
    /// Upper speed bound for adaptation (m/s)
    pub max_speed: f32,
    /// Lower speed bound for adaptation (m/s)
    pub min_speed: f32,
    /// Turn-rate reduction exponent
    pub angular_sensitivity: i32,
    /// Turn rate at which spacing is minimal (rad/s)
    pub max_angular_speed: f32,
    /// Loop closure radius (meters)
    pub flush_dist: f32,
    /// Waypoint acceptance radius during return (meters)
    pub guide_change_dist: f32,
    /// Ticks between whole-path refreshes
    pub guide_update_ticks: i32,
    /// Minimum waypoint separation (meters)
    pub min_waypoint_dist: f32,
    /// Planet radius (kilometers)
    pub planet_radius_km: f32,
    /// Overflow policy code (0 = refuse, 1 = recycle interior)
    pub overflow_policy: i32,
}

impl Default for RtbParams {
    fn default() -> Self {
        Self {
            geo_mode: DEFAULT_GEO_MODE,
            save_dist: DEFAULT_SAVE_DIST,
            adaptive_longitudinal: DEFAULT_ADAPTIVE_LONGITUDINAL,
            adaptive_angular: DEFAULT_ADAPTIVE_ANGULAR,
            max_speed: DEFAULT_MAX_SPEED,
            min_speed: DEFAULT_MIN_SPEED,
            angular_sensitivity: DEFAULT_ANGULAR_SENSITIVITY,
            max_angular_speed: DEFAULT_MAX_ANGULAR_SPEED,
            flush_dist: DEFAULT_FLUSH_DIST,
            guide_change_dist: DEFAULT_GUIDE_CHANGE_DIST,
            guide_update_ticks: DEFAULT_GUIDE_UPDATE_TICKS,
            min_waypoint_dist: DEFAULT_MIN_WAYPOINT_DIST,
            planet_radius_km: DEFAULT_PLANET_RADIUS_KM,
            overflow_policy: DEFAULT_OVERFLOW_POLICY,
        }
    }
}

impl RtbParams {
    /// Register return-to-base parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register("RTB_GEO_MODE", ParamValue::Int(DEFAULT_GEO_MODE))?;
        store.register("RTB_SAVE_DIST", ParamValue::Float(DEFAULT_SAVE_DIST))?;
        store.register(
            "RTB_ADPT_LONG",
            ParamValue::Bool(DEFAULT_ADAPTIVE_LONGITUDINAL),
        )?;
        store.register("RTB_ADPT_ANG", ParamValue::Bool(DEFAULT_ADAPTIVE_ANGULAR))?;
        store.register("RTB_SPD_MAX", ParamValue::Float(DEFAULT_MAX_SPEED))?;
        store.register("RTB_SPD_MIN", ParamValue::Float(DEFAULT_MIN_SPEED))?;
        store.register(
            "RTB_ANG_SENS",
            ParamValue::Int(DEFAULT_ANGULAR_SENSITIVITY),
        )?;
        store.register("RTB_ANG_MAX", ParamValue::Float(DEFAULT_MAX_ANGULAR_SPEED))?;
        store.register("RTB_FLUSH_DIST", ParamValue::Float(DEFAULT_FLUSH_DIST))?;
        store.register("RTB_WP_CHANGE", ParamValue::Float(DEFAULT_GUIDE_CHANGE_DIST))?;
        store.register("RTB_UPD_TICKS", ParamValue::Int(DEFAULT_GUIDE_UPDATE_TICKS))?;
        store.register(
            "RTB_WP_MIN_DIST",
            ParamValue::Float(DEFAULT_MIN_WAYPOINT_DIST),
        )?;
        store.register("RTB_EARTH_RAD", ParamValue::Float(DEFAULT_PLANET_RADIUS_KM))?;
        store.register("RTB_OVF_POLICY", ParamValue::Int(DEFAULT_OVERFLOW_POLICY))?;

        Ok(())
    }

    /// Load return-to-base parameters from parameter store
    ///
    /// Out-of-range values are clamped; missing or mistyped entries fall
    /// back to defaults. Cross-field consistency is left to [`is_valid`].
    ///
    /// [`is_valid`]: RtbParams::is_valid
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            geo_mode: load_int(
                store,
                "RTB_GEO_MODE",
                DEFAULT_GEO_MODE,
                MIN_GEO_MODE,
                MAX_GEO_MODE,
            ),
            save_dist: load_float(
                store,
                "RTB_SAVE_DIST",
                DEFAULT_SAVE_DIST,
                MIN_SAVE_DIST,
                MAX_SAVE_DIST,
            ),
            adaptive_longitudinal: load_bool(store, "RTB_ADPT_LONG", DEFAULT_ADAPTIVE_LONGITUDINAL),
            adaptive_angular: load_bool(store, "RTB_ADPT_ANG", DEFAULT_ADAPTIVE_ANGULAR),
            max_speed: load_float(
                store,
                "RTB_SPD_MAX",
                DEFAULT_MAX_SPEED,
                MIN_MAX_SPEED,
                MAX_SPEED,
            ),
            min_speed: load_float(
                store,
                "RTB_SPD_MIN",
                DEFAULT_MIN_SPEED,
                MIN_MIN_SPEED,
                MAX_SPEED,
            ),
            angular_sensitivity: load_int(
                store,
                "RTB_ANG_SENS",
                DEFAULT_ANGULAR_SENSITIVITY,
                MIN_ANGULAR_SENSITIVITY,
                MAX_ANGULAR_SENSITIVITY,
            ),
            max_angular_speed: load_float(
                store,
                "RTB_ANG_MAX",
                DEFAULT_MAX_ANGULAR_SPEED,
                MIN_ANGULAR_SPEED,
                MAX_ANGULAR_SPEED,
            ),
            flush_dist: load_float(
                store,
                "RTB_FLUSH_DIST",
                DEFAULT_FLUSH_DIST,
                MIN_FLUSH_DIST,
                MAX_FLUSH_DIST,
            ),
            guide_change_dist: load_float(
                store,
                "RTB_WP_CHANGE",
                DEFAULT_GUIDE_CHANGE_DIST,
                MIN_GUIDE_CHANGE_DIST,
                MAX_GUIDE_CHANGE_DIST,
            ),
            guide_update_ticks: load_int(
                store,
                "RTB_UPD_TICKS",
                DEFAULT_GUIDE_UPDATE_TICKS,
                MIN_UPDATE_TICKS,
                MAX_UPDATE_TICKS,
            ),
            min_waypoint_dist: load_float(
                store,
                "RTB_WP_MIN_DIST",
                DEFAULT_MIN_WAYPOINT_DIST,
                MIN_WAYPOINT_DIST,
                MAX_WAYPOINT_DIST,
            ),
            planet_radius_km: load_float(
                store,
                "RTB_EARTH_RAD",
                DEFAULT_PLANET_RADIUS_KM,
                MIN_PLANET_RADIUS_KM,
                MAX_PLANET_RADIUS_KM,
            ),
            overflow_policy: load_int(
                store,
                "RTB_OVF_POLICY",
                DEFAULT_OVERFLOW_POLICY,
                MIN_OVERFLOW_POLICY,
                MAX_OVERFLOW_POLICY,
            ),
        }
    }

    /// Convert to `RtbConfig` for use by `ReturnToBase`
    ///
    /// Unknown mode or policy codes fall back to the defaults.
    pub fn to_config(&self) -> RtbConfig {
        RtbConfig {
            geometry: CoordinateMode::from_i32(self.geo_mode).unwrap_or_default(),
            save_dist: self.save_dist,
            adaptive_longitudinal: self.adaptive_longitudinal,
            adaptive_angular: self.adaptive_angular,
            max_speed: self.max_speed,
            min_speed: self.min_speed,
            angular_sensitivity: self.angular_sensitivity,
            max_angular_speed: self.max_angular_speed,
            flush_dist: self.flush_dist,
            guide_change_dist: self.guide_change_dist,
            guide_update_ticks: self.guide_update_ticks.clamp(MIN_UPDATE_TICKS, MAX_UPDATE_TICKS)
                as u16,
            min_waypoint_dist: self.min_waypoint_dist,
            planet_radius_km: self.planet_radius_km,
            overflow: OverflowPolicy::from_i32(self.overflow_policy).unwrap_or_default(),
        }
    }

    /// Validate return-to-base parameters
    pub fn is_valid(&self) -> bool {
        // Range checks
        if self.geo_mode < MIN_GEO_MODE || self.geo_mode > MAX_GEO_MODE {
            return false;
        }
        if self.save_dist < MIN_SAVE_DIST || self.save_dist > MAX_SAVE_DIST {
            return false;
        }
        if self.max_speed < MIN_MAX_SPEED || self.max_speed > MAX_SPEED {
            return false;
        }
        if self.min_speed < MIN_MIN_SPEED || self.min_speed > MAX_SPEED {
            return false;
        }
        if self.angular_sensitivity < MIN_ANGULAR_SENSITIVITY
            || self.angular_sensitivity > MAX_ANGULAR_SENSITIVITY
        {
            return false;
        }
        if self.max_angular_speed < MIN_ANGULAR_SPEED || self.max_angular_speed > MAX_ANGULAR_SPEED
        {
            return false;
        }
        if self.flush_dist < MIN_FLUSH_DIST || self.flush_dist > MAX_FLUSH_DIST {
            return false;
        }
        if self.guide_change_dist < MIN_GUIDE_CHANGE_DIST
            || self.guide_change_dist > MAX_GUIDE_CHANGE_DIST
        {
            return false;
        }
        if self.guide_update_ticks < MIN_UPDATE_TICKS || self.guide_update_ticks > MAX_UPDATE_TICKS
        {
            return false;
        }
        if self.min_waypoint_dist < MIN_WAYPOINT_DIST || self.min_waypoint_dist > MAX_WAYPOINT_DIST
        {
            return false;
        }
        if self.planet_radius_km < MIN_PLANET_RADIUS_KM
            || self.planet_radius_km > MAX_PLANET_RADIUS_KM
        {
            return false;
        }
        if self.overflow_policy < MIN_OVERFLOW_POLICY || self.overflow_policy > MAX_OVERFLOW_POLICY
        {
            return false;
        }

        // Consistency: speed window must be non-empty
        if self.min_speed >= self.max_speed {
            return false;
        }

        // Consistency: minimum separation cannot exceed nominal spacing
        if self.min_waypoint_dist > self.save_dist {
            return false;
        }

        true
    }
}

/// Load a float parameter from store with clamping
fn load_float(store: &ParameterStore, name: &str, default: f32, min: f32, max: f32) -> f32 {
    match store.get(name) {
        Some(ParamValue::Float(v)) if v.is_finite() => v.clamp(min, max),
        Some(ParamValue::Int(v)) => (*v as f32).clamp(min, max),
        _ => default,
    }
}

/// Load an integer parameter from store with clamping
fn load_int(store: &ParameterStore, name: &str, default: i32, min: i32, max: i32) -> i32 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => (*v).clamp(min, max),
        Some(ParamValue::Bool(b)) => (*b as i32).clamp(min, max),
        _ => default,
    }
}

/// Load a boolean parameter; integers are truthy when non-zero
fn load_bool(store: &ParameterStore, name: &str, default: bool) -> bool {
    match store.get(name) {
        Some(ParamValue::Bool(b)) => *b,
        Some(ParamValue::Int(v)) => *v != 0,
        _ => default,
    }
}
