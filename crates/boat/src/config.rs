//! Runtime configuration

use waypilot_core::{NavParams, Waypoint, WaypointTable};

use crate::devices::ServoMap;
use crate::error::{BoatError, Result};

/// Default magnetic declination in degrees, east positive.
pub const DEFAULT_DECLINATION_DEG: f32 = -13.0;

/// Everything the runtime needs to bring the boat up.
#[derive(Debug, Clone)]
pub struct BoatConfig {
    /// GPS receiver serial device.
    pub serial_path: String,
    pub baud_rate: u32,
    /// Mission waypoints; slot 0 is home.
    pub waypoints: Vec<Waypoint>,
    /// Use slot 0 as configured instead of capturing home from the fix.
    pub fixed_home: bool,
    pub nav: NavParams,
    /// Magnetic declination applied to compass readings.
    pub declination_deg: f32,
    pub tick_interval_ms: u64,
    pub acquisition_interval_ms: u64,
    pub servo: ServoMap,
}

impl Default for BoatConfig {
    fn default() -> Self {
        Self {
            serial_path: "/dev/ttyAMA0".to_string(),
            baud_rate: 4800,
            waypoints: Vec::new(),
            fixed_home: false,
            nav: NavParams::default(),
            declination_deg: DEFAULT_DECLINATION_DEG,
            tick_interval_ms: 100,
            acquisition_interval_ms: 200,
            servo: ServoMap::default(),
        }
    }
}

impl BoatConfig {
    /// Validate the configuration and build the waypoint table.
    pub fn waypoint_table(&self) -> Result<WaypointTable> {
        self.nav.validate().map_err(|e| BoatError::Config(e.into()))?;
        self.servo.validate().map_err(|e| BoatError::Config(e.into()))?;
        WaypointTable::new(&self.waypoints, self.fixed_home)
            .map_err(|e| BoatError::Config(e.into()))
    }
}

/// Parse a `lat,lon` pair in decimal degrees.
pub fn parse_waypoint(s: &str) -> Result<Waypoint> {
    let err = || BoatError::Config(format!("waypoint '{s}' is not 'lat,lon' in decimal degrees"));
    let (lat, lon) = s.split_once(',').ok_or_else(err)?;
    let lat: f64 = lat.trim().parse().map_err(|_| err())?;
    let lon: f64 = lon.trim().parse().map_err(|_| err())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(err());
    }
    Ok(Waypoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_pair() {
        let wp = parse_waypoint("33.7147, -117.8022").unwrap();
        assert!((wp.lat - 33.7147).abs() < 1e-9);
        assert!((wp.lon + 117.8022).abs() < 1e-9);
    }

    #[test]
    fn rejects_out_of_range_and_malformed() {
        assert!(parse_waypoint("91.0,0.0").is_err());
        assert!(parse_waypoint("0.0,181.0").is_err());
        assert!(parse_waypoint("not a waypoint").is_err());
        assert!(parse_waypoint("1.0").is_err());
    }

    #[test]
    fn table_requires_enough_waypoints() {
        let mut config = BoatConfig::default();
        config.waypoints = vec![Waypoint::new(0.0, 0.0)];
        assert!(config.waypoint_table().is_err());

        config.waypoints.push(Waypoint::new(1.0, 0.0));
        assert!(config.waypoint_table().is_ok());
    }

    #[test]
    fn table_rejects_bad_nav_params() {
        let mut config = BoatConfig::default();
        config.waypoints = vec![Waypoint::new(0.0, 0.0), Waypoint::new(1.0, 0.0)];
        config.nav.bearing_tolerance_deg = -1.0;
        assert!(config.waypoint_table().is_err());
    }

    #[test]
    fn table_rejects_out_of_range_servo_map() {
        let mut config = BoatConfig::default();
        config.waypoints = vec![Waypoint::new(0.0, 0.0), Waypoint::new(1.0, 0.0)];
        config.servo.rudder_full_right = 200;
        assert!(config.waypoint_table().is_err());
    }
}
