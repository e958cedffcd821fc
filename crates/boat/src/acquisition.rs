//! GPS acquisition task
//!
//! Owns the receiver UART on its own thread: polls for NMEA data, merges
//! sentences into fixes, and publishes each one through [`SharedFix`].
//! The control loop never touches the serial port.

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::devices::gps::NmeaFixSource;
use crate::error::Result;
use crate::platform::traits::UartInterface;
use crate::shared::{SharedFix, ShutdownToken};

/// Default pause between UART polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// The acquisition side of the fix pipeline.
pub struct AcquisitionTask<U: UartInterface> {
    source: NmeaFixSource<U>,
    shared: SharedFix,
    shutdown: ShutdownToken,
    poll_interval: Duration,
}

impl<U: UartInterface> AcquisitionTask<U> {
    pub fn new(source: NmeaFixSource<U>, shared: SharedFix, shutdown: ShutdownToken) -> Self {
        Self {
            source,
            shared,
            shutdown,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// One poll-and-publish cycle.
    pub fn cycle(&mut self) -> Result<()> {
        if let Some(fix) = self.source.poll()? {
            self.shared.publish(fix);
        }
        Ok(())
    }

    /// Run until shutdown is requested.
    ///
    /// UART errors are logged and the loop keeps going; a flaky serial
    /// line must not take the publisher down while the boat is out.
    pub fn run(mut self) {
        info!("gps acquisition running");
        while !self.shutdown.is_requested() {
            if let Err(e) = self.cycle() {
                warn!(error = %e, "gps poll failed");
            }
            thread::sleep(self.poll_interval);
        }
        info!("gps acquisition stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockUart;
    use crate::platform::traits::UartConfig;

    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    fn task(shared: SharedFix) -> AcquisitionTask<MockUart> {
        let source = NmeaFixSource::new(MockUart::new(UartConfig::default()));
        AcquisitionTask::new(source, shared, ShutdownToken::new())
    }

    #[test]
    fn cycle_publishes_parsed_fix() {
        let shared = SharedFix::new();
        let mut task = task(shared.clone());
        task.source.uart_mut().inject_rx_data(GGA);

        task.cycle().unwrap();
        let fix = shared.snapshot();
        assert!(fix.locked);
        assert!((fix.latitude - 48.1173).abs() < 0.001);
    }

    #[test]
    fn cycle_without_data_leaves_fix_untouched() {
        let shared = SharedFix::new();
        shared.publish(waypilot_core::GpsFix::locked_at(1.0, 2.0));

        let mut task = task(shared.clone());
        task.cycle().unwrap();
        // No new sentence: the previous publish stands
        assert!(shared.snapshot().locked);
    }

    #[test]
    fn run_exits_on_shutdown() {
        let shared = SharedFix::new();
        let source = NmeaFixSource::new(MockUart::new(UartConfig::default()));
        let shutdown = ShutdownToken::new();
        let task = AcquisitionTask::new(source, shared, shutdown.clone())
            .with_poll_interval(Duration::from_millis(1));

        shutdown.request();
        let handle = std::thread::spawn(move || task.run());
        handle.join().unwrap();
    }
}
