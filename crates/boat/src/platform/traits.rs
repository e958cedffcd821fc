//! Bus abstraction traits
//!
//! Device drivers are generic over these interfaces, so they run unchanged
//! against real hardware, the register-map simulation, and the test mocks.

use crate::error::Result;

/// UART configuration
#[derive(Debug, Clone, Copy)]
pub struct UartConfig {
    /// Baud rate (GPS receivers typically speak 4800 or 9600)
    pub baud_rate: u32,
    /// Read timeout in milliseconds
    pub timeout_ms: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_rate: 4800,
            timeout_ms: 50,
        }
    }
}

/// Byte-stream serial interface.
pub trait UartInterface {
    /// Write bytes, returning the number written.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Non-blocking read into `buffer`, returning the number of bytes read.
    /// Returns `Ok(0)` when no data is pending.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// True when received data is waiting.
    fn available(&self) -> bool;

    /// Block until all queued transmit data has left the port.
    fn flush(&mut self) -> Result<()>;
}

/// I2C bus master interface.
///
/// Addresses are 7-bit. Implementations map their transport errors to
/// [`crate::error::I2cError`].
pub trait I2cInterface {
    /// Complete write transaction: START - ADDR(W) - DATA - STOP.
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()>;

    /// Complete read transaction: START - ADDR(R) - DATA - STOP.
    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()>;

    /// Combined write-read with a repeated START. Used to select a
    /// register then read its value.
    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()>;
}
