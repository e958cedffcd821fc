//! Navigation geometry and steering decision
//!
//! Pure functions and types consumed by the sequencer each tick.

mod geo;
mod steering;
mod types;

pub use geo::{wrap_180, wrap_360, GeoModel, Haversine};
pub use steering::{direction_to_bearing, TurnDirection};
pub use types::{NavAction, NavInfo, RudderCommand, ThrottleCommand};
