//! GPS fix source (NMEA protocol)
//!
//! Drains the receiver's UART, feeds the bytes through an NMEA parser,
//! and merges GGA, RMC and VTG sentences into a [`GpsFix`]. Generic over
//! [`UartInterface`], so it runs against a real serial port or a mock.

use nmea0183::{ParseResult, Parser};
use tracing::trace;

use waypilot_core::filters::RunningAverage;
use waypilot_core::GpsFix;

use crate::error::Result;
use crate::platform::traits::UartInterface;

/// Knots to statute miles per hour.
const KNOTS_TO_MPH: f32 = 1.150_779;

/// Merge state across sentence types.
///
/// GGA carries position, RMC carries speed and course; a fix snapshot is
/// only meaningful once position has arrived. An empty GGA or RMC body
/// (the receiver emits those while searching) drops the lock flag.
#[derive(Debug, Clone, Copy, Default)]
struct MergeState {
    latitude: Option<f64>,
    longitude: Option<f64>,
    speed_mph: f32,
    course_deg: f32,
    locked: bool,
}

impl MergeState {
    fn to_fix(self) -> Option<GpsFix> {
        let (latitude, longitude) = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ if !self.locked => (0.0, 0.0),
            _ => return None,
        };
        Some(GpsFix {
            latitude,
            longitude,
            speed_mph: self.speed_mph,
            course_deg: self.course_deg,
            locked: self.locked,
            time: None,
        })
    }

    fn update_from_gga(&mut self, gga: &nmea0183::GGA) {
        self.latitude = Some(gga.latitude.as_f64());
        self.longitude = Some(gga.longitude.as_f64());
        self.locked = true;
    }

    fn update_from_rmc(&mut self, rmc: &nmea0183::RMC, speed_mph: f32) {
        self.speed_mph = speed_mph;
        if let Some(course) = &rmc.course {
            self.course_deg = course.degrees;
        }
        self.locked = true;
    }

    fn update_from_vtg(&mut self, vtg: &nmea0183::VTG, speed_mph: f32) {
        self.speed_mph = speed_mph;
        if let Some(course) = &vtg.course {
            self.course_deg = course.degrees;
        }
    }
}

/// Samples of ground speed averaged before publication.
const SPEED_AVG_WINDOW: usize = 5;

/// NMEA fix source.
pub struct NmeaFixSource<U: UartInterface> {
    uart: U,
    parser: Parser,
    state: MergeState,
    /// Ground speed is noisy at boat speeds; publish a short average.
    speed_filter: RunningAverage,
}

impl<U: UartInterface> NmeaFixSource<U> {
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            parser: Parser::new(),
            state: MergeState::default(),
            speed_filter: RunningAverage::new(SPEED_AVG_WINDOW),
        }
    }

    /// Direct UART access, for receiver init commands and test setup.
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Drain pending receiver bytes and parse them.
    ///
    /// Returns `Some(fix)` when at least one complete sentence updated the
    /// merge state this call, `None` otherwise. A returned fix with
    /// `locked == false` means the receiver reported loss of solution.
    pub fn poll(&mut self) -> Result<Option<GpsFix>> {
        let mut updated = false;

        loop {
            let mut buf = [0u8; 64];
            let n = self.uart.read(&mut buf)?;
            if n == 0 {
                break;
            }
            for &byte in buf.iter().take(n) {
                if let Some(result) = self.parser.parse_from_byte(byte) {
                    match result {
                        Ok(ParseResult::GGA(Some(gga))) => {
                            self.state.update_from_gga(&gga);
                            updated = true;
                        }
                        // Empty body: sentence valid but no solution
                        Ok(ParseResult::GGA(None)) => {
                            self.state.locked = false;
                            updated = true;
                        }
                        Ok(ParseResult::RMC(Some(rmc))) => {
                            let speed = self
                                .speed_filter
                                .apply(rmc.speed.as_knots() * KNOTS_TO_MPH);
                            self.state.update_from_rmc(&rmc, speed);
                            updated = true;
                        }
                        Ok(ParseResult::RMC(None)) => {
                            self.state.locked = false;
                            updated = true;
                        }
                        Ok(ParseResult::VTG(Some(vtg))) => {
                            let speed = self
                                .speed_filter
                                .apply(vtg.speed.as_knots() * KNOTS_TO_MPH);
                            self.state.update_from_vtg(&vtg, speed);
                            updated = true;
                        }
                        Ok(_) => {}
                        Err(e) => trace!(error = e, "nmea parse error"),
                    }
                }
            }
        }

        if updated {
            Ok(self.state.to_fix())
        } else {
            Ok(None)
        }
    }

    /// Last merged fix without touching the UART.
    pub fn current_fix(&self) -> Option<GpsFix> {
        self.state.to_fix()
    }
}
