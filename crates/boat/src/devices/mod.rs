//! Device drivers
//!
//! Capability traits for the boat's sensors and actuators, plus the
//! concrete drivers. The control loop only ever sees the traits.

pub mod actuator;
pub mod compass;
pub mod gps;

pub use actuator::{ServoBridge, ServoMap};
pub use compass::Hmc6343;
pub use gps::NmeaFixSource;

use waypilot_core::navigation::{RudderCommand, ThrottleCommand};

use crate::error::Result;

/// Heading sensor.
pub trait Compass {
    /// Declination-corrected heading in degrees [0, 360).
    fn heading_deg(&mut self) -> Result<f32>;
}

/// Rudder and throttle output.
pub trait Actuator {
    fn set_rudder(&mut self, command: RudderCommand) -> Result<()>;
    fn set_throttle(&mut self, command: ThrottleCommand) -> Result<()>;
}
