//! Navigation type definitions
//!
//! Types exchanged between the sequencer and the runtime: derived range and
//! bearing data, and the logical actuator settings the sequencer commands.

/// Range and bearing to the active target, derived each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NavInfo {
    /// Distance to the active waypoint in meters.
    pub distance_m: f32,
    /// Bearing to the active waypoint in degrees [0, 360).
    pub bearing_deg: f32,
    /// Current compass heading in degrees [0, 360).
    pub heading_deg: f32,
}

/// Logical rudder settings.
///
/// `FullLeft`/`FullRight` are the hard-over commands used for the initial
/// turn toward a new leg; `Left`/`Right` are the partial corrections used
/// while tracking. A configuration layer maps each to a bounded servo value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RudderCommand {
    FullLeft,
    Left,
    Center,
    Right,
    FullRight,
}

/// Logical throttle settings, mapped by configuration to the ESC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleCommand {
    Stop,
    Forward25,
    Forward50,
    Forward100,
}

/// One actuator command emitted by a sequencer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Steer(RudderCommand),
    Throttle(ThrottleCommand),
}
