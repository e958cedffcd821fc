//! Register-map I2C simulation
//!
//! Stands in for the boat's I2C devices when running on a bench host
//! with no bus wired up. Each address gets a 256-byte register file;
//! device-specific read behavior (the compass heading stream) is modeled
//! just far enough for the drivers to operate.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{I2cError, Result};
use crate::platform::traits::I2cInterface;

/// Simulated I2C bus with per-address register files.
#[derive(Debug, Default)]
pub struct SimI2c {
    registers: HashMap<u8, [u8; 256]>,
    /// Register selected by the last plain write, per address.
    selected: HashMap<u8, u8>,
    /// Addresses that answer at all; everything else NACKs.
    present: Vec<u8>,
    /// Heading in tenths of a degree returned for compass data reads.
    heading_tenths: i16,
}

impl SimI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `addr` as a responding device.
    pub fn attach(&mut self, addr: u8) {
        if !self.present.contains(&addr) {
            self.present.push(addr);
        }
        self.registers.entry(addr).or_insert([0u8; 256]);
    }

    /// Preload a register value, e.g. a bridge firmware version.
    pub fn set_register(&mut self, addr: u8, reg: u8, value: u8) {
        self.attach(addr);
        if let Some(file) = self.registers.get_mut(&addr) {
            file[reg as usize] = value;
        }
    }

    /// Set the heading the simulated compass reports.
    pub fn set_heading_deg(&mut self, heading: f32) {
        self.heading_tenths = (heading * 10.0) as i16;
    }

    fn ensure_present(&self, addr: u8) -> Result<()> {
        if self.present.contains(&addr) {
            Ok(())
        } else {
            Err(I2cError::Nack.into())
        }
    }
}

impl I2cInterface for SimI2c {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.ensure_present(addr)?;
        match data.len() {
            0 => {}
            1 => {
                // Register select or a command byte
                self.selected.insert(addr, data[0]);
            }
            _ => {
                let reg = data[0] as usize;
                if let Some(file) = self.registers.get_mut(&addr) {
                    for (i, byte) in data[1..].iter().enumerate() {
                        if reg + i < file.len() {
                            file[reg + i] = *byte;
                        }
                    }
                }
                debug!(addr, reg = data[0], value = ?&data[1..], "sim i2c write");
            }
        }
        Ok(())
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.ensure_present(addr)?;
        // Data reads stream the modeled heading: big-endian tenths of a
        // degree in the first word, zeros after.
        buffer.fill(0);
        let tenths = self.heading_tenths.to_be_bytes();
        for (dst, src) in buffer.iter_mut().zip(tenths.iter()) {
            *dst = *src;
        }
        Ok(())
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.ensure_present(addr)?;
        read_buffer.fill(0);
        let reg = write_data.first().copied().unwrap_or(0) as usize;
        if let Some(file) = self.registers.get(&addr) {
            for (i, dst) in read_buffer.iter_mut().enumerate() {
                if reg + i < file.len() {
                    *dst = file[reg + i];
                }
            }
        }
        Ok(())
    }
}
