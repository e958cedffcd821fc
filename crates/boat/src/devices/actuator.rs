//! Servo bridge driver
//!
//! The rudder servo and ESC hang off a small I2C bridge MCU with a
//! register-per-channel protocol. This driver maps the sequencer's
//! logical rudder and throttle settings to bridge register writes.

use tracing::debug;

use waypilot_core::navigation::{RudderCommand, ThrottleCommand};

use crate::devices::Actuator;
use crate::error::{BoatError, Result};
use crate::platform::traits::I2cInterface;

/// 7-bit bus address of the bridge MCU.
pub const BRIDGE_ADDR: u8 = 0x04;

/// Firmware version this driver was written against.
pub const EXPECTED_VERSION: u8 = 0x0B;

/// Bridge register map.
pub mod reg {
    pub const VERSION: u8 = 0x00;
    pub const STEERING: u8 = 0x01;
    pub const ESC: u8 = 0x02;
    pub const LED: u8 = 0x03;
}

/// Servo endpoint calibration.
///
/// Rudder values are servo degrees; the ESC range is inverted, with
/// larger values meaning less throttle.
#[derive(Debug, Clone, Copy)]
pub struct ServoMap {
    pub rudder_full_left: u8,
    pub rudder_left: u8,
    pub rudder_center: u8,
    pub rudder_right: u8,
    pub rudder_full_right: u8,
    /// Mirror rudder values around 90 degrees for an inverted linkage.
    pub rudder_reversed: bool,
    pub throttle_stop: u8,
    pub throttle_25: u8,
    pub throttle_50: u8,
    pub throttle_100: u8,
}

impl Default for ServoMap {
    fn default() -> Self {
        Self {
            rudder_full_left: 35,
            rudder_left: 55,
            rudder_center: 75,
            rudder_right: 93,
            rudder_full_right: 110,
            rudder_reversed: false,
            throttle_stop: 170,
            throttle_25: 160,
            throttle_50: 150,
            throttle_100: 140,
        }
    }
}

impl ServoMap {
    /// Check every endpoint against the servo's mechanical range.
    pub fn validate(&self) -> core::result::Result<(), &'static str> {
        let rudder = [
            self.rudder_full_left,
            self.rudder_left,
            self.rudder_center,
            self.rudder_right,
            self.rudder_full_right,
        ];
        if rudder.iter().any(|&v| v > 180) {
            return Err("rudder servo values out of range (0-180 degrees)");
        }
        if !rudder.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err("rudder servo values out of order (full left through full right)");
        }
        let throttle = [
            self.throttle_100,
            self.throttle_50,
            self.throttle_25,
            self.throttle_stop,
        ];
        if !throttle.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err("throttle values out of order (inverted, stop is highest)");
        }
        Ok(())
    }

    fn rudder_value(&self, command: RudderCommand) -> u8 {
        let value = match command {
            RudderCommand::FullLeft => self.rudder_full_left,
            RudderCommand::Left => self.rudder_left,
            RudderCommand::Center => self.rudder_center,
            RudderCommand::Right => self.rudder_right,
            RudderCommand::FullRight => self.rudder_full_right,
        };
        if self.rudder_reversed {
            180u8.saturating_sub(value)
        } else {
            value
        }
    }

    fn throttle_value(&self, command: ThrottleCommand) -> u8 {
        match command {
            ThrottleCommand::Stop => self.throttle_stop,
            ThrottleCommand::Forward25 => self.throttle_25,
            ThrottleCommand::Forward50 => self.throttle_50,
            ThrottleCommand::Forward100 => self.throttle_100,
        }
    }
}

/// Driver for the servo bridge MCU.
pub struct ServoBridge<I: I2cInterface> {
    i2c: I,
    map: ServoMap,
}

impl<I: I2cInterface> ServoBridge<I> {
    pub fn new(i2c: I, map: ServoMap) -> Self {
        Self { i2c, map }
    }

    pub fn i2c_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    /// Read the bridge firmware version register.
    pub fn version(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(BRIDGE_ADDR, &[reg::VERSION], &mut buf)?;
        Ok(buf[0])
    }

    /// Verify the bridge answers with the expected firmware version.
    pub fn probe(&mut self) -> Result<()> {
        let got = self.version()?;
        if got != EXPECTED_VERSION {
            return Err(BoatError::BridgeVersion {
                got,
                expected: EXPECTED_VERSION,
            });
        }
        Ok(())
    }

    /// Drive the status LED.
    pub fn set_led(&mut self, on: bool) -> Result<()> {
        self.i2c.write(BRIDGE_ADDR, &[reg::LED, u8::from(on)])
    }
}

impl<I: I2cInterface> Actuator for ServoBridge<I> {
    fn set_rudder(&mut self, command: RudderCommand) -> Result<()> {
        let value = self.map.rudder_value(command);
        debug!(?command, value, "rudder");
        self.i2c.write(BRIDGE_ADDR, &[reg::STEERING, value])
    }

    fn set_throttle(&mut self, command: ThrottleCommand) -> Result<()> {
        let value = self.map.throttle_value(command);
        debug!(?command, value, "throttle");
        self.i2c.write(BRIDGE_ADDR, &[reg::ESC, value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{I2cTransaction, MockI2c};

    fn bridge() -> ServoBridge<MockI2c> {
        ServoBridge::new(MockI2c::new(), ServoMap::default())
    }

    #[test]
    fn rudder_commands_hit_steering_register() {
        let mut bridge = bridge();
        bridge.set_rudder(RudderCommand::FullLeft).unwrap();
        bridge.set_rudder(RudderCommand::Center).unwrap();
        bridge.set_rudder(RudderCommand::FullRight).unwrap();

        let log = bridge.i2c_mut().transactions();
        assert_eq!(
            log,
            vec![
                I2cTransaction::Write {
                    addr: BRIDGE_ADDR,
                    data: vec![reg::STEERING, 35]
                },
                I2cTransaction::Write {
                    addr: BRIDGE_ADDR,
                    data: vec![reg::STEERING, 75]
                },
                I2cTransaction::Write {
                    addr: BRIDGE_ADDR,
                    data: vec![reg::STEERING, 110]
                },
            ]
        );
    }

    #[test]
    fn reversed_linkage_mirrors_around_ninety() {
        let map = ServoMap {
            rudder_reversed: true,
            ..ServoMap::default()
        };
        let mut bridge = ServoBridge::new(MockI2c::new(), map);
        bridge.set_rudder(RudderCommand::FullLeft).unwrap();

        let log = bridge.i2c_mut().transactions();
        assert_eq!(
            log[0],
            I2cTransaction::Write {
                addr: BRIDGE_ADDR,
                data: vec![reg::STEERING, 145]
            }
        );
    }

    #[test]
    fn throttle_range_is_inverted() {
        let mut bridge = bridge();
        bridge.set_throttle(ThrottleCommand::Stop).unwrap();
        bridge.set_throttle(ThrottleCommand::Forward100).unwrap();

        let log = bridge.i2c_mut().transactions();
        assert_eq!(
            log,
            vec![
                I2cTransaction::Write {
                    addr: BRIDGE_ADDR,
                    data: vec![reg::ESC, 170]
                },
                I2cTransaction::Write {
                    addr: BRIDGE_ADDR,
                    data: vec![reg::ESC, 140]
                },
            ]
        );
    }

    #[test]
    fn reversed_linkage_pins_oversize_values_at_zero() {
        // An unvalidated map above the servo range must not underflow
        // the mirror arithmetic.
        let map = ServoMap {
            rudder_full_left: 200,
            rudder_reversed: true,
            ..ServoMap::default()
        };
        let mut bridge = ServoBridge::new(MockI2c::new(), map);
        bridge.set_rudder(RudderCommand::FullLeft).unwrap();

        let log = bridge.i2c_mut().transactions();
        assert_eq!(
            log[0],
            I2cTransaction::Write {
                addr: BRIDGE_ADDR,
                data: vec![reg::STEERING, 0]
            }
        );
    }

    #[test]
    fn servo_map_validation_bounds_and_ordering() {
        assert!(ServoMap::default().validate().is_ok());

        let oversize = ServoMap {
            rudder_full_right: 181,
            ..ServoMap::default()
        };
        assert!(oversize.validate().is_err());

        let disordered = ServoMap {
            rudder_left: 30,
            ..ServoMap::default()
        };
        assert!(disordered.validate().is_err());

        let flat_throttle = ServoMap {
            throttle_25: 170,
            ..ServoMap::default()
        };
        assert!(flat_throttle.validate().is_err());
    }

    #[test]
    fn led_writes_its_register() {
        let mut bridge = bridge();
        bridge.set_led(true).unwrap();
        bridge.set_led(false).unwrap();

        let log = bridge.i2c_mut().transactions();
        assert_eq!(
            log,
            vec![
                I2cTransaction::Write {
                    addr: BRIDGE_ADDR,
                    data: vec![reg::LED, 1]
                },
                I2cTransaction::Write {
                    addr: BRIDGE_ADDR,
                    data: vec![reg::LED, 0]
                },
            ]
        );
    }

    #[test]
    fn probe_rejects_unexpected_version() {
        let mut i2c = MockI2c::new();
        i2c.set_read_data(&[0x07]);
        let mut bridge = ServoBridge::new(i2c, ServoMap::default());
        assert!(bridge.probe().is_err());
    }

    #[test]
    fn probe_accepts_expected_version() {
        let mut i2c = MockI2c::new();
        i2c.set_read_data(&[EXPECTED_VERSION]);
        let mut bridge = ServoBridge::new(i2c, ServoMap::default());
        assert!(bridge.probe().is_ok());
    }
}
