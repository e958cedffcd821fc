//! HMC6343 tilt-compensated compass driver

use tracing::warn;

use waypilot_core::navigation::wrap_360;

use crate::devices::Compass;
use crate::error::{BoatError, Result};
use crate::platform::traits::I2cInterface;

/// 7-bit bus address.
pub const HMC6343_ADDR: u8 = 0x19;

/// "Post heading data" command.
const CMD_POST_HEADING: u8 = 0x50;

/// Response length: heading, pitch, roll as big-endian i16 tenths.
const RESPONSE_LEN: usize = 6;

const DEFAULT_FAILURE_LIMIT: u32 = 3;

/// HMC6343 driver.
///
/// Each read posts the heading command, then fetches a six-byte response
/// whose first word is the heading in tenths of a degree. A bus error
/// surfaces immediately so the caller can hold its last good heading and
/// try again on its own cadence; after `failure_limit` consecutive
/// errors the driver reports the compass unresponsive instead.
pub struct Hmc6343<I: I2cInterface> {
    i2c: I,
    /// Magnetic declination added to every reading, degrees east positive.
    declination_deg: f32,
    failure_limit: u32,
    consecutive_failures: u32,
}

impl<I: I2cInterface> Hmc6343<I> {
    pub fn new(i2c: I, declination_deg: f32) -> Self {
        Self {
            i2c,
            declination_deg,
            failure_limit: DEFAULT_FAILURE_LIMIT,
            consecutive_failures: 0,
        }
    }

    /// Override the consecutive-failure limit.
    pub fn with_failure_limit(mut self, limit: u32) -> Self {
        self.failure_limit = limit.max(1);
        self
    }

    pub fn i2c_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    fn read_raw_tenths(&mut self) -> Result<i16> {
        self.i2c.write(HMC6343_ADDR, &[CMD_POST_HEADING])?;
        let mut response = [0u8; RESPONSE_LEN];
        self.i2c.read(HMC6343_ADDR, &mut response)?;
        Ok(i16::from_be_bytes([response[0], response[1]]))
    }
}

impl<I: I2cInterface> Compass for Hmc6343<I> {
    fn heading_deg(&mut self) -> Result<f32> {
        match self.read_raw_tenths() {
            Ok(tenths) => {
                self.consecutive_failures = 0;
                let magnetic = f32::from(tenths) / 10.0;
                Ok(wrap_360(magnetic + self.declination_deg))
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(failures = self.consecutive_failures, error = %e, "compass read failed");
                if self.consecutive_failures >= self.failure_limit {
                    Err(BoatError::CompassUnresponsive {
                        attempts: self.consecutive_failures,
                    })
                } else {
                    Err(e)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{I2cTransaction, MockI2c};

    fn compass_with_tenths(tenths: i16, declination: f32) -> Hmc6343<MockI2c> {
        let mut i2c = MockI2c::new();
        let be = tenths.to_be_bytes();
        i2c.set_read_data(&[be[0], be[1], 0, 0, 0, 0]);
        Hmc6343::new(i2c, declination)
    }

    #[test]
    fn posts_command_then_reads_six_bytes() {
        let mut compass = compass_with_tenths(900, 0.0);
        compass.heading_deg().unwrap();

        let log = compass.i2c_mut().transactions();
        assert_eq!(
            log[0],
            I2cTransaction::Write {
                addr: HMC6343_ADDR,
                data: vec![CMD_POST_HEADING]
            }
        );
        assert_eq!(
            log[1],
            I2cTransaction::Read {
                addr: HMC6343_ADDR,
                len: RESPONSE_LEN
            }
        );
    }

    #[test]
    fn converts_tenths_and_applies_declination() {
        // 90.0 degrees magnetic, 13 degrees west declination
        let mut compass = compass_with_tenths(900, -13.0);
        let heading = compass.heading_deg().unwrap();
        assert!((heading - 77.0).abs() < 0.01);
    }

    #[test]
    fn declination_wraps_through_north() {
        let mut compass = compass_with_tenths(50, -13.0);
        let heading = compass.heading_deg().unwrap();
        assert!((heading - 352.0).abs() < 0.01);
    }

    #[test]
    fn one_bus_attempt_per_read() {
        let mut i2c = MockI2c::new();
        i2c.fail_next(1);
        i2c.set_read_data(&1800i16.to_be_bytes());
        let mut compass = Hmc6343::new(i2c, 0.0);

        // The failing call burns exactly one injected failure and does
        // not spin on the bus; the very next call succeeds.
        assert!(compass.heading_deg().is_err());
        let heading = compass.heading_deg().unwrap();
        assert!((heading - 180.0).abs() < 0.01);
    }

    #[test]
    fn recovery_resets_the_failure_count() {
        let mut i2c = MockI2c::new();
        i2c.fail_next(2);
        i2c.set_read_data(&1800i16.to_be_bytes());
        let mut compass = Hmc6343::new(i2c, 0.0);

        assert!(matches!(compass.heading_deg(), Err(BoatError::I2c(_))));
        assert!(matches!(compass.heading_deg(), Err(BoatError::I2c(_))));
        assert!(compass.heading_deg().is_ok());

        // A fresh fault after recovery starts the count over
        compass.i2c_mut().fail_next(1);
        assert!(matches!(compass.heading_deg(), Err(BoatError::I2c(_))));
    }

    #[test]
    fn reports_unresponsive_after_consecutive_failures() {
        let mut i2c = MockI2c::new();
        i2c.fail_next(10);
        let mut compass = Hmc6343::new(i2c, 0.0);

        assert!(matches!(compass.heading_deg(), Err(BoatError::I2c(_))));
        assert!(matches!(compass.heading_deg(), Err(BoatError::I2c(_))));
        match compass.heading_deg() {
            Err(BoatError::CompassUnresponsive { attempts: 3 }) => {}
            other => panic!("expected CompassUnresponsive, got {other:?}"),
        }
    }
}
