//! Great-circle geometry
//!
//! Haversine distance and forward azimuth between two lat/lon pairs, plus
//! angle wrapping helpers. The sequencer consumes these through [`GeoModel`]
//! so tests can script geometry without real coordinates.

use libm::{atan2, cos, sin, sqrt};

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Great-circle course and distance provider.
///
/// Contract per the navigation core: `course_to` returns degrees in
/// [0, 360), `distance_between` returns meters. Invoked fresh each time the
/// sequencer needs range/bearing; implementations must not cache.
pub trait GeoModel {
    /// Initial bearing in degrees [0, 360) from `(from_lat, from_lon)`
    /// toward `(to_lat, to_lon)`.
    fn course_to(&self, from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> f32;

    /// Great-circle distance in meters between the two points.
    fn distance_between(&self, from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> f32;
}

/// Spherical-earth haversine implementation of [`GeoModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl GeoModel for Haversine {
    fn course_to(&self, from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> f32 {
        let lat1 = from_lat * DEG_TO_RAD;
        let lat2 = to_lat * DEG_TO_RAD;
        let delta_lon = (to_lon - from_lon) * DEG_TO_RAD;

        let y = sin(delta_lon) * cos(lat2);
        let x = cos(lat1) * sin(lat2) - sin(lat1) * cos(lat2) * cos(delta_lon);
        let bearing = atan2(y, x) * RAD_TO_DEG;

        wrap_360(bearing as f32)
    }

    fn distance_between(&self, from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> f32 {
        let lat1 = from_lat * DEG_TO_RAD;
        let lat2 = to_lat * DEG_TO_RAD;
        let delta_lat = (to_lat - from_lat) * DEG_TO_RAD;
        let delta_lon = (to_lon - from_lon) * DEG_TO_RAD;

        let sin_dlat = sin(delta_lat / 2.0);
        let sin_dlon = sin(delta_lon / 2.0);
        let a = sin_dlat * sin_dlat + cos(lat1) * cos(lat2) * sin_dlon * sin_dlon;
        let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));

        (EARTH_RADIUS_M * c) as f32
    }
}

/// Normalize an angle to the [0, 360) range.
pub fn wrap_360(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a < 0.0 {
        a += 360.0;
    }
    a
}

/// Normalize an angle to the (-180, +180] range.
pub fn wrap_180(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a < -180.0 {
        a += 360.0;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_one_degree_latitude() {
        // ~111km per degree of latitude
        let d = Haversine.distance_between(35.0, 139.0, 36.0, 139.0);
        assert!((d - 111_000.0).abs() < 1_000.0);
    }

    #[test]
    fn course_cardinal_directions() {
        let north = Haversine.course_to(35.0, 139.0, 36.0, 139.0);
        assert!(north < 1.0 || north > 359.0);

        let east = Haversine.course_to(35.0, 139.0, 35.0, 140.0);
        assert!((east - 90.0).abs() < 1.0);

        let south = Haversine.course_to(36.0, 139.0, 35.0, 139.0);
        assert!((south - 180.0).abs() < 1.0);

        let west = Haversine.course_to(35.0, 140.0, 35.0, 139.0);
        assert!((west - 270.0).abs() < 1.0);
    }

    #[test]
    fn course_is_always_in_range() {
        let cases = [
            (0.0, 0.0, -1.0, -1.0),
            (33.7147, -117.8022, 33.7150, -117.8021),
            (-45.0, 170.0, -44.0, -170.0),
        ];
        for (lat1, lon1, lat2, lon2) in cases {
            let course = Haversine.course_to(lat1, lon1, lat2, lon2);
            assert!((0.0..360.0).contains(&course), "course {course} out of range");
        }
    }

    #[test]
    fn distance_same_point_is_zero() {
        let d = Haversine.distance_between(33.7147, -117.8022, 33.7147, -117.8022);
        assert!(d.abs() < 0.01);
    }

    #[test]
    fn wrap_360_cases() {
        assert!((wrap_360(0.0)).abs() < 0.001);
        assert!((wrap_360(361.0) - 1.0).abs() < 0.001);
        assert!((wrap_360(-13.0) - 347.0).abs() < 0.001);
        assert!((wrap_360(720.5) - 0.5).abs() < 0.001);
    }

    #[test]
    fn wrap_180_cases() {
        assert!((wrap_180(270.0) + 90.0).abs() < 0.001);
        assert!((wrap_180(-270.0) - 90.0).abs() < 0.001);
        assert!((wrap_180(180.0) - 180.0).abs() < 0.001);
    }
}
