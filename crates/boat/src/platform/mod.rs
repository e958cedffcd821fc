//! Bus backends
//!
//! Trait definitions plus three implementations: a real serial port, a
//! register-map I2C simulation for bench runs, and in-memory mocks for
//! tests.

pub mod mock;
pub mod serial;
pub mod sim;
pub mod traits;

pub use mock::{I2cTransaction, MockI2c, MockUart};
pub use serial::SerialUart;
pub use sim::SimI2c;
pub use traits::{I2cInterface, UartConfig, UartInterface};
