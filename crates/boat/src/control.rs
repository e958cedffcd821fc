//! Navigation control loop
//!
//! Samples the shared fix and the compass each tick, drives the
//! sequencer, and applies the resulting commands to the actuator.
//! Generic over the compass, actuator, and time source, so the whole
//! loop runs under test with mocks and a simulated clock.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use waypilot_core::filters::HeadingFilter;
use waypilot_core::navigation::{Haversine, NavAction, RudderCommand, ThrottleCommand};
use waypilot_core::traits::TimeSource;
use waypilot_core::{NavParams, NavSequencer, TickInputs, WaypointTable};

use crate::devices::{Actuator, Compass};
use crate::error::Result;
use crate::shared::{SharedFix, SharedStatus, ShutdownToken, StatusSnapshot};

/// Default control tick period.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// The control side of the fix pipeline.
pub struct ControlLoop<C, A, T>
where
    C: Compass,
    A: Actuator,
    T: TimeSource,
{
    sequencer: NavSequencer,
    table: WaypointTable,
    compass: C,
    actuator: A,
    time: T,
    fix: SharedFix,
    status: SharedStatus,
    shutdown: ShutdownToken,
    heading_filter: HeadingFilter,
    /// Last good heading, reused while the compass misbehaves.
    last_heading_deg: f32,
    tick_interval: Duration,
}

impl<C, A, T> ControlLoop<C, A, T>
where
    C: Compass,
    A: Actuator,
    T: TimeSource,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        params: NavParams,
        table: WaypointTable,
        compass: C,
        actuator: A,
        time: T,
        fix: SharedFix,
        status: SharedStatus,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            sequencer: NavSequencer::new(params),
            table,
            compass,
            actuator,
            time,
            fix,
            status,
            shutdown,
            heading_filter: HeadingFilter::default(),
            last_heading_deg: 0.0,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn sequencer(&self) -> &NavSequencer {
        &self.sequencer
    }

    /// Restart a mission parked in the hold state.
    pub fn resume(&mut self) {
        self.sequencer.resume();
    }

    /// One control tick: sample, sequence, actuate.
    pub fn tick(&mut self) -> Result<()> {
        let fix = self.fix.snapshot();

        // A failed compass read is survivable; hold the last heading for
        // this tick and give the bus another try next tick.
        let heading = match self.compass.heading_deg() {
            Ok(h) => {
                let filtered = self.heading_filter.apply(h);
                self.last_heading_deg = filtered;
                filtered
            }
            Err(e) => {
                warn!(error = %e, "using stale heading");
                self.last_heading_deg
            }
        };

        let inputs = TickInputs {
            fix,
            heading_deg: heading,
            now_ms: self.time.now_ms(),
        };

        let before = self.sequencer.state();
        let actions = self.sequencer.tick(&inputs, &mut self.table, &Haversine);
        let after = self.sequencer.state();
        if before != after {
            info!(from = before.name(), to = after.name(), "nav state");
        }

        // An actuator write failure is logged, not fatal: the sequencer
        // re-emits its commands and the next tick retries the bus.
        for action in &actions {
            let result = match action {
                NavAction::Steer(rudder) => self.actuator.set_rudder(*rudder),
                NavAction::Throttle(throttle) => self.actuator.set_throttle(*throttle),
            };
            if let Err(e) = result {
                warn!(?action, error = %e, "actuator write failed");
            }
        }

        self.status.publish(StatusSnapshot {
            state_name: after.name(),
            nav: self.sequencer.nav_info(),
            fix,
            target_index: self.sequencer.target_index(),
        });

        debug!(
            state = after.name(),
            distance_m = self.sequencer.nav_info().distance_m,
            bearing = self.sequencer.nav_info().bearing_deg,
            heading,
            "tick"
        );
        Ok(())
    }

    /// Run until shutdown, then leave the actuators safe.
    pub fn run(mut self) -> Result<()> {
        info!("control loop running");
        while !self.shutdown.is_requested() {
            self.tick()?;
            thread::sleep(self.tick_interval);
        }
        self.actuator.set_throttle(ThrottleCommand::Stop)?;
        self.actuator.set_rudder(RudderCommand::Center)?;
        info!("control loop stopped, actuators safed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoatError, I2cError};
    use waypilot_core::{GpsFix, NavState, Waypoint};

    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Test clock shared between the harness and the loop under test.
    #[derive(Clone, Default)]
    struct SharedClock(Rc<Cell<u64>>);

    impl SharedClock {
        fn advance(&self, ms: u64) {
            self.0.set(self.0.get() + ms);
        }
    }

    impl TimeSource for SharedClock {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    /// Compass stub with a scriptable reading.
    struct FakeCompass {
        heading: Rc<RefCell<f32>>,
        fail: Rc<RefCell<bool>>,
    }

    impl Compass for FakeCompass {
        fn heading_deg(&mut self) -> Result<f32> {
            if *self.fail.borrow() {
                return Err(BoatError::I2c(I2cError::Nack));
            }
            Ok(*self.heading.borrow())
        }
    }

    /// Actuator stub recording every command.
    #[derive(Default)]
    struct FakeActuator {
        rudder: Rc<RefCell<Vec<RudderCommand>>>,
        throttle: Rc<RefCell<Vec<ThrottleCommand>>>,
    }

    impl Actuator for FakeActuator {
        fn set_rudder(&mut self, command: RudderCommand) -> Result<()> {
            self.rudder.borrow_mut().push(command);
            Ok(())
        }
        fn set_throttle(&mut self, command: ThrottleCommand) -> Result<()> {
            self.throttle.borrow_mut().push(command);
            Ok(())
        }
    }

    struct Harness {
        control: ControlLoop<FakeCompass, FakeActuator, SharedClock>,
        heading: Rc<RefCell<f32>>,
        compass_fail: Rc<RefCell<bool>>,
        rudder: Rc<RefCell<Vec<RudderCommand>>>,
        throttle: Rc<RefCell<Vec<ThrottleCommand>>>,
        fix: SharedFix,
        time: SharedClock,
    }

    fn harness() -> Harness {
        let heading = Rc::new(RefCell::new(0.0f32));
        let compass_fail = Rc::new(RefCell::new(false));
        let compass = FakeCompass {
            heading: heading.clone(),
            fail: compass_fail.clone(),
        };
        let actuator = FakeActuator::default();
        let rudder = actuator.rudder.clone();
        let throttle = actuator.throttle.clone();

        let table = WaypointTable::new(
            &[Waypoint::new(0.0, 0.0), Waypoint::new(1.0, 0.0)],
            false,
        )
        .unwrap();
        let fix = SharedFix::new();
        let time = SharedClock::default();

        let control = ControlLoop::new(
            NavParams::default(),
            table,
            compass,
            actuator,
            time.clone(),
            fix.clone(),
            SharedStatus::new(),
            ShutdownToken::new(),
        );

        Harness {
            control,
            heading,
            compass_fail,
            rudder,
            throttle,
            fix,
            time,
        }
    }

    #[test]
    fn first_tick_safes_actuators() {
        let mut h = harness();
        h.control.tick().unwrap();
        assert_eq!(h.rudder.borrow()[0], RudderCommand::Center);
        assert_eq!(h.throttle.borrow()[0], ThrottleCommand::Stop);
        assert_eq!(h.control.sequencer().state(), NavState::WaitForLock);
    }

    #[test]
    fn mission_starts_after_lock_and_stabilization() {
        let mut h = harness();
        h.fix.publish(GpsFix::locked_at(0.0, 0.0));

        h.control.tick().unwrap(); // Init
        h.control.tick().unwrap(); // lock seen
        h.time.advance(1_000);
        h.control.tick().unwrap(); // stabilized
        h.control.tick().unwrap(); // waypoint selected
        assert_eq!(h.control.sequencer().state(), NavState::Start);
        assert_eq!(h.control.sequencer().target_index(), 1);
    }

    #[test]
    fn heading_wobble_across_north_never_steers_away() {
        let mut h = harness();
        h.fix.publish(GpsFix::locked_at(0.0, 0.0));
        *h.heading.borrow_mut() = 1.0;

        h.control.tick().unwrap(); // Init
        h.control.tick().unwrap(); // lock seen
        h.time.advance(1_000);
        h.control.tick().unwrap(); // stabilized
        h.control.tick().unwrap(); // waypoint selected
        h.control.tick().unwrap(); // aligned, straight through Start
        assert_eq!(h.control.sequencer().state(), NavState::Run);

        // Target bearing stays near 0 and the compass flips from 1 to
        // 359 degrees. One degree to port must keep reading as one
        // degree, not as a quarter turn to starboard, so the loop never
        // commands a port correction.
        h.rudder.borrow_mut().clear();
        *h.heading.borrow_mut() = 359.0;
        for _ in 0..10 {
            h.control.tick().unwrap();
        }
        let rudder = h.rudder.borrow();
        assert!(!rudder.is_empty());
        assert!(!rudder.contains(&RudderCommand::Left));
        assert!(!rudder.contains(&RudderCommand::FullLeft));
    }

    #[test]
    fn compass_failure_reuses_last_heading() {
        let mut h = harness();
        *h.heading.borrow_mut() = 90.0;
        h.control.tick().unwrap();

        *h.compass_fail.borrow_mut() = true;
        h.control.tick().unwrap();
        // Ticks keep flowing on the stale value; no panic, no stall
        assert_eq!(h.control.sequencer().state(), NavState::WaitForLock);
    }

    #[test]
    fn status_snapshot_tracks_sequencer() {
        let heading = Rc::new(RefCell::new(0.0f32));
        let compass = FakeCompass {
            heading: heading.clone(),
            fail: Rc::new(RefCell::new(false)),
        };
        let table = WaypointTable::new(
            &[Waypoint::new(0.0, 0.0), Waypoint::new(1.0, 0.0)],
            false,
        )
        .unwrap();
        let status = SharedStatus::new();
        let mut control = ControlLoop::new(
            NavParams::default(),
            table,
            compass,
            FakeActuator::default(),
            SharedClock::default(),
            SharedFix::new(),
            status.clone(),
            ShutdownToken::new(),
        );

        control.tick().unwrap();
        assert_eq!(status.snapshot().state_name, "Wait for GPS Lock");
    }
}
