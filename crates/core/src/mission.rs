//! Waypoint storage
//!
//! An ordered, fixed-capacity table of target coordinates with a cyclic
//! cursor. Slot 0 is the "home" waypoint: unless a fixed home position was
//! configured, it is captured from the live fix once, when the GPS has
//! stabilized after first lock.

use heapless::Vec;

/// Maximum number of waypoints in a mission.
pub const MAX_WAYPOINTS: usize = 10;

/// Minimum number of waypoints (home plus at least one target).
pub const MIN_WAYPOINTS: usize = 2;

/// A single target coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Waypoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Ordered waypoint table with a cyclic target cursor.
///
/// The cursor is advanced modulo table length exclusively by the navigation
/// sequencer. The table itself is configuration-time constant apart from the
/// one-shot home capture.
#[derive(Debug, Clone)]
pub struct WaypointTable {
    waypoints: Vec<Waypoint, MAX_WAYPOINTS>,
    /// True when slot 0 was configured explicitly and must not be
    /// overwritten at stabilization.
    fixed_home: bool,
}

impl WaypointTable {
    /// Build a table from an ordered list of waypoints.
    ///
    /// `fixed_home` marks slot 0 as an operator-configured home position;
    /// when false, slot 0 is a placeholder that will be captured from the
    /// first stable fix.
    ///
    /// Returns an error when the list is outside the 2..=10 bound.
    pub fn new(waypoints: &[Waypoint], fixed_home: bool) -> Result<Self, &'static str> {
        if waypoints.len() < MIN_WAYPOINTS {
            return Err("waypoint table needs home plus at least one target");
        }
        let mut table = Vec::new();
        for wp in waypoints {
            table.push(*wp).map_err(|_| "waypoint table full (max 10)")?;
        }
        Ok(Self {
            waypoints: table,
            fixed_home,
        })
    }

    /// Number of waypoints in the table.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// True when slot 0 was configured explicitly.
    pub fn has_fixed_home(&self) -> bool {
        self.fixed_home
    }

    /// Waypoint at `index`; `None` past the end.
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Next cursor value after `index`, wrapping at the table length.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.waypoints.len()
    }

    /// Overwrite the home slot with the given coordinates.
    ///
    /// Called by the sequencer exactly once, at stabilization completion,
    /// and only when no fixed home was configured.
    pub fn capture_home(&mut self, lat: f64, lon: f64) {
        self.waypoints[0] = Waypoint::new(lat, lon);
    }
}
