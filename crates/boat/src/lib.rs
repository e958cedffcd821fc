//! waypilot_boat - Host runtime for the waypilot autopilot
//!
//! Binds the pure navigation logic from `waypilot_core` to real hardware:
//! a serial NMEA receiver, an HMC6343 compass, and an I2C servo bridge.
//! Two threads share the latest GPS fix under a mutex: the acquisition
//! task owns the receiver and publishes fixes; the control loop consumes
//! them, runs the sequencer, and drives the actuators.

pub mod acquisition;
pub mod clock;
pub mod config;
pub mod control;
pub mod devices;
pub mod error;
pub mod platform;
pub mod shared;

pub use acquisition::AcquisitionTask;
pub use clock::MonotonicClock;
pub use config::BoatConfig;
pub use control::ControlLoop;
pub use error::{BoatError, Result};
pub use shared::{SharedFix, SharedStatus, ShutdownToken, StatusSnapshot};
