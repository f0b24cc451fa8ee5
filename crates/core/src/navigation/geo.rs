//! Distance and heading strategies
//!
//! Recorded distances depend on the strategy, so it is chosen once from the
//! configuration and stays fixed until the module is re-initialized.
//!
//! - [`Planar`]: Euclidean norm on a local (x, y) plane in meters
//! - [`Spherical`]: Haversine great-circle distance on (lat, lon) degrees
//! - [`Geometry`]: Runtime-selected wrapper stored in the controller

use libm::{atan2, cos, sin, sqrt};
use nalgebra::Vector2;

use super::types::Position;

const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Coordinate interpretation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CoordinateMode {
    /// Local plane, meters
    #[default]
    Euclidean,
    /// Geographic latitude/longitude, degrees
    LatLon,
}

impl CoordinateMode {
    /// Decode from a parameter value (0 = Euclidean, 1 = LatLon)
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(CoordinateMode::Euclidean),
            1 => Some(CoordinateMode::LatLon),
            _ => None,
        }
    }

    /// Encode as a parameter value
    pub fn as_i32(&self) -> i32 {
        match self {
            CoordinateMode::Euclidean => 0,
            CoordinateMode::LatLon => 1,
        }
    }
}

/// Distance and bearing between two positions
///
/// Implementations must be symmetric in `distance` and satisfy the triangle
/// inequality for their geometry.
pub trait DistanceStrategy {
    /// Distance in meters, always >= 0
    fn distance(&self, a: &Position, b: &Position) -> f32;

    /// Bearing from `from` to `to` in degrees (0-360, clockwise from north/+y)
    fn bearing(&self, from: &Position, to: &Position) -> f32;
}

/// Euclidean distance on a local plane
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Planar;

impl DistanceStrategy for Planar {
    fn distance(&self, a: &Position, b: &Position) -> f32 {
        Vector2::new(b.x - a.x, b.y - a.y).norm() as f32
    }

    fn bearing(&self, from: &Position, to: &Position) -> f32 {
        // +y is north, +x is east
        let bearing = atan2(to.x - from.x, to.y - from.y) * RAD_TO_DEG;
        wrap_360(bearing as f32)
    }
}

/// Great-circle distance on a sphere (haversine)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    radius_m: f64,
}

impl Spherical {
    /// Create a spherical strategy with the given radius in kilometers
    pub const fn new(radius_km: f32) -> Self {
        Self {
            radius_m: radius_km as f64 * 1000.0,
        }
    }

    /// Radius in meters
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }
}

impl Default for Spherical {
    fn default() -> Self {
        Self::new(6371.0)
    }
}

impl DistanceStrategy for Spherical {
    fn distance(&self, a: &Position, b: &Position) -> f32 {
        let lat1 = a.latitude() * DEG_TO_RAD;
        let lat2 = b.latitude() * DEG_TO_RAD;
        let delta_lat = (b.latitude() - a.latitude()) * DEG_TO_RAD;
        let delta_lon = (b.longitude() - a.longitude()) * DEG_TO_RAD;

        let sin_dlat = sin(delta_lat / 2.0);
        let sin_dlon = sin(delta_lon / 2.0);
        let h = sin_dlat * sin_dlat + cos(lat1) * cos(lat2) * sin_dlon * sin_dlon;
        // Rounding can push h marginally outside [0, 1] for antipodal points
        let h = h.clamp(0.0, 1.0);
        let c = 2.0 * atan2(sqrt(h), sqrt(1.0 - h));

        (self.radius_m * c) as f32
    }

    fn bearing(&self, from: &Position, to: &Position) -> f32 {
        let lat1 = from.latitude() * DEG_TO_RAD;
        let lat2 = to.latitude() * DEG_TO_RAD;
        let delta_lon = (to.longitude() - from.longitude()) * DEG_TO_RAD;

        let y = sin(delta_lon) * cos(lat2);
        let x = cos(lat1) * sin(lat2) - sin(lat1) * cos(lat2) * cos(delta_lon);
        wrap_360((atan2(y, x) * RAD_TO_DEG) as f32)
    }
}

/// Strategy selected at configuration time
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geometry {
    /// Local plane
    Planar(Planar),
    /// Sphere of configured radius
    Spherical(Spherical),
}

impl Geometry {
    /// Build the strategy for a coordinate mode
    pub const fn new(mode: CoordinateMode, radius_km: f32) -> Self {
        match mode {
            CoordinateMode::Euclidean => Geometry::Planar(Planar),
            CoordinateMode::LatLon => Geometry::Spherical(Spherical::new(radius_km)),
        }
    }

    /// Coordinate mode this strategy serves
    pub fn mode(&self) -> CoordinateMode {
        match self {
            Geometry::Planar(_) => CoordinateMode::Euclidean,
            Geometry::Spherical(_) => CoordinateMode::LatLon,
        }
    }
}

impl DistanceStrategy for Geometry {
    fn distance(&self, a: &Position, b: &Position) -> f32 {
        match self {
            Geometry::Planar(s) => s.distance(a, b),
            Geometry::Spherical(s) => s.distance(a, b),
        }
    }

    fn bearing(&self, from: &Position, to: &Position) -> f32 {
        match self {
            Geometry::Planar(s) => s.bearing(from, to),
            Geometry::Spherical(s) => s.bearing(from, to),
        }
    }
}

/// Wrap an angle into the 0-360 range
pub fn wrap_360(angle: f32) -> f32 {
    let a = angle % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance() {
        let d = Planar.distance(&Position::new(0.0, 0.0), &Position::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_planar_distance_symmetric() {
        let a = Position::new(-12.5, 7.25);
        let b = Position::new(30.0, -2.0);
        assert!((Planar.distance(&a, &b) - Planar.distance(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn test_planar_bearing_cardinal() {
        let origin = Position::new(0.0, 0.0);
        assert!(Planar.bearing(&origin, &Position::new(0.0, 10.0)).abs() < 0.01);
        assert!((Planar.bearing(&origin, &Position::new(10.0, 0.0)) - 90.0).abs() < 0.01);
        assert!((Planar.bearing(&origin, &Position::new(0.0, -10.0)) - 180.0).abs() < 0.01);
        assert!((Planar.bearing(&origin, &Position::new(-10.0, 0.0)) - 270.0).abs() < 0.01);
    }

    #[test]
    fn test_spherical_one_degree_latitude() {
        // ~111 km per degree of latitude
        let d = Spherical::default().distance(
            &Position::from_lat_lon(35.0, 139.0),
            &Position::from_lat_lon(36.0, 139.0),
        );
        assert!((d - 111_195.0).abs() < 100.0);
    }

    #[test]
    fn test_spherical_short_distance_resolution() {
        // 1e-5 degrees of latitude is ~1.11 m
        let d = Spherical::default().distance(
            &Position::from_lat_lon(35.0, 139.0),
            &Position::from_lat_lon(35.00001, 139.0),
        );
        assert!((d - 1.112).abs() < 0.01);
    }

    #[test]
    fn test_spherical_radius_scales_distance() {
        let a = Position::from_lat_lon(0.0, 0.0);
        let b = Position::from_lat_lon(0.0, 1.0);
        let earth = Spherical::new(6371.0).distance(&a, &b);
        let half = Spherical::new(3185.5).distance(&a, &b);
        assert!((earth / half - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_spherical_bearing_east() {
        let b = Spherical::default().bearing(
            &Position::from_lat_lon(35.0, 139.0),
            &Position::from_lat_lon(35.0, 140.0),
        );
        assert!((b - 90.0).abs() < 1.0);
    }

    #[test]
    fn test_geometry_dispatch() {
        let planar = Geometry::new(CoordinateMode::Euclidean, 6371.0);
        let spherical = Geometry::new(CoordinateMode::LatLon, 6371.0);
        assert_eq!(planar.mode(), CoordinateMode::Euclidean);
        assert_eq!(spherical.mode(), CoordinateMode::LatLon);

        let a = Position::new(0.0, 0.0);
        let b = Position::new(0.0, 1.0);
        assert!((planar.distance(&a, &b) - 1.0).abs() < 1e-6);
        assert!(spherical.distance(&a, &b) > 100_000.0);
    }

    #[test]
    fn test_coordinate_mode_codes() {
        assert_eq!(CoordinateMode::from_i32(0), Some(CoordinateMode::Euclidean));
        assert_eq!(CoordinateMode::from_i32(1), Some(CoordinateMode::LatLon));
        assert_eq!(CoordinateMode::from_i32(2), None);
        assert_eq!(CoordinateMode::LatLon.as_i32(), 1);
    }

    #[test]
    fn test_wrap_360() {
        assert!((wrap_360(-90.0) - 270.0).abs() < 0.001);
        assert!((wrap_360(450.0) - 90.0).abs() < 0.001);
        assert!(wrap_360(0.0).abs() < 0.001);
    }
}
