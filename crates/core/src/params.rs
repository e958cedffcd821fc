//! Navigation parameters
//!
//! Tunables for the sequencer with defaults taken from the reference boat
//! configuration. `validate()` enforces the documented ranges before a
//! mission starts.

// --- Defaults ---

const DEFAULT_BEARING_TOLERANCE_DEG: f32 = 10.0;
const DEFAULT_ARRIVAL_DISTANCE_M: f32 = 2.0;
const DEFAULT_STABILIZE_SECS: u32 = 1;

// --- Ranges ---

const MIN_BEARING_TOLERANCE_DEG: f32 = 1.0;
const MAX_BEARING_TOLERANCE_DEG: f32 = 90.0;

const MIN_ARRIVAL_DISTANCE_M: f32 = 0.5;
const MAX_ARRIVAL_DISTANCE_M: f32 = 100.0;

const MAX_STABILIZE_SECS: u32 = 120;

/// Sequencer tuning parameters.
#[derive(Debug, Clone, Copy)]
pub struct NavParams {
    /// Angular slack (degrees) within which "straight" is accepted. The
    /// sequencer halves this once the boat is within 10% of the leg's
    /// initial distance.
    pub bearing_tolerance_deg: f32,
    /// Distance (meters) at which the active waypoint counts as reached.
    pub arrival_distance_m: f32,
    /// Wall-clock seconds to wait after first lock before navigating.
    pub stabilize_secs: u32,
}

impl Default for NavParams {
    fn default() -> Self {
        Self {
            bearing_tolerance_deg: DEFAULT_BEARING_TOLERANCE_DEG,
            arrival_distance_m: DEFAULT_ARRIVAL_DISTANCE_M,
            stabilize_secs: DEFAULT_STABILIZE_SECS,
        }
    }
}

impl NavParams {
    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(MIN_BEARING_TOLERANCE_DEG..=MAX_BEARING_TOLERANCE_DEG)
            .contains(&self.bearing_tolerance_deg)
        {
            return Err("bearing tolerance out of range (1-90 degrees)");
        }
        if !(MIN_ARRIVAL_DISTANCE_M..=MAX_ARRIVAL_DISTANCE_M).contains(&self.arrival_distance_m) {
            return Err("arrival distance out of range (0.5-100 meters)");
        }
        if self.stabilize_secs > MAX_STABILIZE_SECS {
            return Err("stabilization time out of range (0-120 seconds)");
        }
        Ok(())
    }
}
