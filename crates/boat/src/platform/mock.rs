//! Mock bus implementations for testing
//!
//! In-memory UART and I2C endpoints that record traffic and replay
//! injected data, so device drivers can be exercised without hardware.

use core::cell::RefCell;

use crate::error::{I2cError, Result};
use crate::platform::traits::{I2cInterface, UartConfig, UartInterface};

/// Mock UART with in-memory transmit and receive buffers.
///
/// # Example
///
/// ```
/// use waypilot_boat::platform::{MockUart, UartConfig, UartInterface};
///
/// let mut uart = MockUart::new(UartConfig::default());
/// uart.inject_rx_data(b"$GPGGA,...");
/// let mut buf = [0u8; 16];
/// let n = uart.read(&mut buf).unwrap();
/// assert!(n > 0);
/// ```
#[derive(Debug)]
pub struct MockUart {
    config: UartConfig,
    tx_buffer: RefCell<Vec<u8>>,
    rx_buffer: RefCell<Vec<u8>>,
}

impl MockUart {
    pub fn new(config: UartConfig) -> Self {
        Self {
            config,
            tx_buffer: RefCell::new(Vec::new()),
            rx_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Transmitted data, for test verification.
    pub fn tx_buffer(&self) -> Vec<u8> {
        self.tx_buffer.borrow().clone()
    }

    /// Queue data to be returned by subsequent reads.
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        self.rx_buffer.borrow_mut().extend_from_slice(data);
    }

    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }
}

impl UartInterface for MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.tx_buffer.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut rx = self.rx_buffer.borrow_mut();
        let to_read = buffer.len().min(rx.len());
        buffer[..to_read].copy_from_slice(&rx[..to_read]);
        rx.drain(..to_read);
        Ok(to_read)
    }

    fn available(&self) -> bool {
        !self.rx_buffer.borrow().is_empty()
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One logged I2C transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    Write { addr: u8, data: Vec<u8> },
    Read { addr: u8, len: usize },
    WriteRead {
        addr: u8,
        write_data: Vec<u8>,
        read_len: usize,
    },
}

/// Mock I2C bus.
///
/// Records every transaction, replays pre-programmed read data, and can
/// fail the next N transactions to exercise retry paths.
#[derive(Debug, Default)]
pub struct MockI2c {
    transactions: RefCell<Vec<I2cTransaction>>,
    read_data: RefCell<Vec<u8>>,
    fail_next: RefCell<u32>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transaction log, for test verification.
    pub fn transactions(&self) -> Vec<I2cTransaction> {
        self.transactions.borrow().clone()
    }

    pub fn clear_transactions(&mut self) {
        self.transactions.borrow_mut().clear();
    }

    /// Queue bytes to be returned by subsequent read operations.
    pub fn set_read_data(&mut self, data: &[u8]) {
        self.read_data.borrow_mut().extend_from_slice(data);
    }

    /// Make the next `count` transactions fail with a NACK.
    pub fn fail_next(&mut self, count: u32) {
        *self.fail_next.borrow_mut() = count;
    }

    fn check_failure(&self) -> Result<()> {
        let mut fail = self.fail_next.borrow_mut();
        if *fail > 0 {
            *fail -= 1;
            return Err(I2cError::Nack.into());
        }
        Ok(())
    }

    fn fill_from_read_data(&self, buffer: &mut [u8]) {
        let mut data = self.read_data.borrow_mut();
        let to_read = buffer.len().min(data.len());
        buffer[..to_read].copy_from_slice(&data[..to_read]);
        data.drain(..to_read);
    }
}

impl I2cInterface for MockI2c {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.check_failure()?;
        self.transactions.borrow_mut().push(I2cTransaction::Write {
            addr,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.check_failure()?;
        self.transactions.borrow_mut().push(I2cTransaction::Read {
            addr,
            len: buffer.len(),
        });
        self.fill_from_read_data(buffer);
        Ok(())
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.check_failure()?;
        self.transactions
            .borrow_mut()
            .push(I2cTransaction::WriteRead {
                addr,
                write_data: write_data.to_vec(),
                read_len: read_buffer.len(),
            });
        self.fill_from_read_data(read_buffer);
        Ok(())
    }
}
