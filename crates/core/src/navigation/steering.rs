//! Bearing-to-turn decision
//!
//! Maps (destination bearing, current heading, tolerance) to a discrete turn
//! command, always taking the shorter angular path around the 0/360 seam.

/// Discrete steering decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
    Straight,
}

/// Decide which way to turn to bring `heading_deg` onto `dest_deg`.
///
/// Both angles are degrees in [0, 360); `tolerance_deg` is the angular slack
/// within which `Straight` is accepted instead of turning. When the raw
/// difference exceeds 180 the decision flips direction, which is exactly the
/// shorter way around the compass seam: a boat heading 350 with a target
/// bearing of 10 turns right through north, not left through south.
pub fn direction_to_bearing(dest_deg: f32, heading_deg: f32, tolerance_deg: f32) -> TurnDirection {
    let diff = dest_deg - heading_deg;
    let abs_diff = diff.abs();
    let big = abs_diff > 180.0;

    if abs_diff <= tolerance_deg {
        return TurnDirection::Straight;
    }

    match (diff < 0.0, big) {
        (false, false) => TurnDirection::Right,
        (false, true) => TurnDirection::Left,
        (true, false) => TurnDirection::Left,
        (true, true) => TurnDirection::Right,
    }
}
