//! Serial port UART backend
//!
//! Wraps a `serialport` handle behind [`UartInterface`] for the GPS
//! receiver attached to a real tty.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::debug;

use crate::error::{BoatError, Result, UartError};
use crate::platform::traits::{UartConfig, UartInterface};

/// UART backed by a host serial port.
pub struct SerialUart {
    port: Box<dyn SerialPort>,
}

impl SerialUart {
    /// Open `path` at the configured baud rate.
    pub fn open(path: &str, config: UartConfig) -> Result<Self> {
        let port = serialport::new(path, config.baud_rate)
            .timeout(Duration::from_millis(u64::from(config.timeout_ms)))
            .open()
            .map_err(|source| BoatError::SerialOpen {
                path: path.to_string(),
                source,
            })?;
        debug!(path, baud = config.baud_rate, "serial port open");
        Ok(Self { port })
    }
}

impl UartInterface for SerialUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.port
            .write(data)
            .map_err(|_| UartError::WriteFailed.into())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        // Only pull what is already pending so the control loop never
        // blocks on the receiver's sentence cadence.
        let pending = self
            .port
            .bytes_to_read()
            .map_err(|_| UartError::ReadFailed)? as usize;
        if pending == 0 {
            return Ok(0);
        }
        let to_read = pending.min(buffer.len());
        match self.port.read(&mut buffer[..to_read]) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(_) => Err(UartError::ReadFailed.into()),
        }
    }

    fn available(&self) -> bool {
        self.port.bytes_to_read().map(|n| n > 0).unwrap_or(false)
    }

    fn flush(&mut self) -> Result<()> {
        self.port.flush().map_err(|_| UartError::WriteFailed.into())
    }
}
