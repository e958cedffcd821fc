//! Error types for the boat runtime

use thiserror::Error;

/// Result type for boat runtime operations
pub type Result<T> = core::result::Result<T, BoatError>;

/// Top-level runtime errors.
#[derive(Debug, Error)]
pub enum BoatError {
    /// Serial port could not be opened
    #[error("failed to open serial port {path}: {source}")]
    SerialOpen {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// UART operation failed
    #[error("uart: {0}")]
    Uart(#[from] UartError),

    /// I2C operation failed
    #[error("i2c: {0}")]
    I2c(#[from] I2cError),

    /// Compass gave no valid reading for too many consecutive attempts
    #[error("compass unresponsive after {attempts} attempts")]
    CompassUnresponsive { attempts: u32 },

    /// Servo bridge reported an unexpected firmware version
    #[error("servo bridge version 0x{got:02X}, expected 0x{expected:02X}")]
    BridgeVersion { got: u8, expected: u8 },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// UART-level errors, produced by `UartInterface` implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UartError {
    #[error("read failed")]
    ReadFailed,
    #[error("write failed")]
    WriteFailed,
    #[error("timeout")]
    Timeout,
}

/// I2C-level errors, produced by `I2cInterface` implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum I2cError {
    #[error("no acknowledgment from device")]
    Nack,
    #[error("bus error")]
    BusError,
    #[error("timeout")]
    Timeout,
}
