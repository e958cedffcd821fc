//! GPS fix snapshot
//!
//! A `GpsFix` is the unit of exchange between the acquisition task and the
//! control loop: acquisition overwrites the whole value under exclusion,
//! the control loop reads the whole value under the same exclusion. The
//! fields are never updated piecemeal across that boundary.

/// UTC time-of-fix (hours/minutes/seconds), when the receiver reports one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// A single resolved position/velocity reading from the GPS receiver.
///
/// `Default` yields the zeroed, unlocked fix the system starts with.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GpsFix {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// Ground speed in miles per hour.
    pub speed_mph: f32,
    /// Course over ground in degrees (0-360).
    pub course_deg: f32,
    /// True while the receiver has a usable position solution.
    pub locked: bool,
    /// UTC time of this fix, when reported.
    pub time: Option<FixTime>,
}

impl GpsFix {
    /// A locked fix at the given coordinates; convenience for tests and
    /// simulated sources.
    pub fn locked_at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            locked: true,
            ..Self::default()
        }
    }
}
