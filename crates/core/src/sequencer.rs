//! Navigation sequencer
//!
//! The finite-state machine that owns mission progress: waiting for GPS
//! lock, stabilizing, selecting waypoints, steering toward them, stopping
//! on lock loss, and idling. Driven once per control-loop tick; each tick
//! evaluates exactly one state and returns the actuator commands to apply.
//!
//! The sequencer does not know about serial ports, I2C, threads, or clocks.
//! Position arrives as a [`GpsFix`] snapshot, heading as a plain degree
//! value, time as the tick's `now_ms`, and geometry through the
//! [`GeoModel`] trait, so every transition is unit-testable in isolation.

use heapless::Vec;

use crate::fix::GpsFix;
use crate::mission::WaypointTable;
use crate::navigation::{
    direction_to_bearing, GeoModel, NavAction, NavInfo, RudderCommand, ThrottleCommand,
    TurnDirection,
};
use crate::params::NavParams;

/// Maximum actuator commands emitted per tick.
pub const MAX_NAV_ACTIONS: usize = 4;

/// Fraction of the initial leg distance below which the bearing tolerance
/// is halved to suppress chattering near the target.
const NEAR_TARGET_FRACTION: f32 = 0.10;

/// In `Run`, range and bearing are recomputed from the latest fix every
/// this many ticks.
const RANGE_UPDATE_TICKS: u32 = 10;

/// Navigation sequencer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Power-on state; resets the target cursor and safes the actuators.
    Init,
    /// Waiting for the receiver's first usable solution.
    WaitForLock,
    /// Lock acquired; letting the solution settle for the configured time.
    WaitForStabilize,
    /// Advancing the target cursor and computing the new leg.
    SetNextWaypoint,
    /// Lock lost mid-mission; waiting for it to return.
    WaitForRelock,
    /// Turning toward the new leg at reduced speed until roughly aligned.
    Start,
    /// Tracking the leg at speed, correcting heading each tick.
    Run,
    /// Commanded stop. Falls through to `WaitForRelock` when lock is absent
    /// and to `Idle` otherwise; the two arrival paths ("leg paused because
    /// lock was lost" and "stopped with lock present") are deliberately not
    /// distinguished here.
    Stop,
    /// Hold state. No automatic exit; see [`NavSequencer::resume`].
    Idle,
}

impl NavState {
    /// Human-readable state name for status displays.
    pub fn name(&self) -> &'static str {
        match self {
            NavState::Init => "Init",
            NavState::WaitForLock => "Wait for GPS Lock",
            NavState::WaitForStabilize => "Wait for GPS to Stabilize",
            NavState::SetNextWaypoint => "Set Next Waypoint",
            NavState::WaitForRelock => "Wait for GPS Relock",
            NavState::Start => "Start",
            NavState::Run => "Run",
            NavState::Stop => "Stop",
            NavState::Idle => "Idle",
        }
    }
}

/// Inputs sampled by the control loop for one sequencer tick.
#[derive(Debug, Clone, Copy)]
pub struct TickInputs {
    /// Latest published fix snapshot.
    pub fix: GpsFix,
    /// Declination-corrected compass heading in degrees [0, 360).
    pub heading_deg: f32,
    /// Monotonic tick timestamp in milliseconds.
    pub now_ms: u64,
}

/// The navigation state machine.
pub struct NavSequencer {
    state: NavState,
    params: NavParams,
    /// Cursor into the waypoint table; owned exclusively by the sequencer.
    target: usize,
    /// Monotonic deadline for GPS stabilization, armed on first lock.
    stabilize_deadline_ms: Option<u64>,
    /// Home has been captured from the live fix (at most once per mission).
    home_captured: bool,
    /// Leg distance recorded when `Start` hands over to `Run`.
    initial_distance_m: f32,
    nav_info: NavInfo,
    run_ticks: u32,
}

impl NavSequencer {
    pub fn new(params: NavParams) -> Self {
        Self {
            state: NavState::Init,
            params,
            target: 0,
            stabilize_deadline_ms: None,
            home_captured: false,
            initial_distance_m: 0.0,
            nav_info: NavInfo::default(),
            run_ticks: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> NavState {
        self.state
    }

    /// Index of the active target waypoint.
    pub fn target_index(&self) -> usize {
        self.target
    }

    /// Latest derived range/bearing/heading.
    pub fn nav_info(&self) -> NavInfo {
        self.nav_info
    }

    /// External restart signal: leaves `Idle` for the next leg.
    ///
    /// This is the explicit command the hold state waits for; it has no
    /// effect in any other state.
    pub fn resume(&mut self) {
        if self.state == NavState::Idle {
            self.state = NavState::SetNextWaypoint;
        }
    }

    /// Evaluate one control-loop tick.
    ///
    /// Acts on exactly one state and returns the actuator commands to
    /// apply, in order. `table` is mutated only by the one-shot home
    /// capture at stabilization completion and the cursor advance in
    /// `SetNextWaypoint`.
    pub fn tick(
        &mut self,
        inputs: &TickInputs,
        table: &mut WaypointTable,
        geo: &dyn GeoModel,
    ) -> Vec<NavAction, MAX_NAV_ACTIONS> {
        let mut actions = Vec::new();

        self.nav_info.heading_deg = inputs.heading_deg;

        match self.state {
            NavState::Init => {
                self.target = 0;
                let _ = actions.push(NavAction::Steer(RudderCommand::Center));
                let _ = actions.push(NavAction::Throttle(ThrottleCommand::Stop));
                self.state = NavState::WaitForLock;
            }

            NavState::WaitForLock => {
                if inputs.fix.locked {
                    self.stabilize_deadline_ms =
                        Some(inputs.now_ms + u64::from(self.params.stabilize_secs) * 1000);
                    self.state = NavState::WaitForStabilize;
                }
            }

            NavState::WaitForStabilize => {
                let done = self
                    .stabilize_deadline_ms
                    .is_some_and(|deadline| inputs.now_ms >= deadline);
                if done {
                    if !table.has_fixed_home() && !self.home_captured {
                        table.capture_home(inputs.fix.latitude, inputs.fix.longitude);
                        self.home_captured = true;
                    }
                    self.stabilize_deadline_ms = None;
                    self.state = NavState::SetNextWaypoint;
                }
            }

            NavState::SetNextWaypoint => {
                self.target = table.next_index(self.target);
                self.update_range_and_bearing(inputs, table, geo);
                self.state = NavState::Start;
            }

            NavState::WaitForRelock => {
                if inputs.fix.locked {
                    self.state = NavState::Start;
                }
            }

            NavState::Start => {
                match direction_to_bearing(
                    self.nav_info.bearing_deg,
                    self.nav_info.heading_deg,
                    self.params.bearing_tolerance_deg,
                ) {
                    TurnDirection::Left => {
                        let _ = actions.push(NavAction::Steer(RudderCommand::FullLeft));
                        let _ = actions.push(NavAction::Throttle(ThrottleCommand::Forward25));
                    }
                    TurnDirection::Right => {
                        let _ = actions.push(NavAction::Steer(RudderCommand::FullRight));
                        let _ = actions.push(NavAction::Throttle(ThrottleCommand::Forward25));
                    }
                    TurnDirection::Straight => {
                        let _ = actions.push(NavAction::Steer(RudderCommand::Center));
                        let _ = actions.push(NavAction::Throttle(ThrottleCommand::Forward50));
                        // Record the leg distance; the tolerance tightens
                        // once 90% of it is behind us.
                        self.update_range_and_bearing(inputs, table, geo);
                        self.initial_distance_m = self.nav_info.distance_m;
                        self.run_ticks = 0;
                        self.state = NavState::Run;
                    }
                }
            }

            NavState::Run => {
                if self.run_ticks % RANGE_UPDATE_TICKS == 0 {
                    self.update_range_and_bearing(inputs, table, geo);
                }
                self.run_ticks = self.run_ticks.wrapping_add(1);

                if !inputs.fix.locked {
                    self.state = NavState::Stop;
                    return actions;
                }

                let tolerance = if self.nav_info.distance_m
                    <= self.initial_distance_m * NEAR_TARGET_FRACTION
                {
                    self.params.bearing_tolerance_deg * 0.5
                } else {
                    self.params.bearing_tolerance_deg
                };

                match direction_to_bearing(
                    self.nav_info.bearing_deg,
                    self.nav_info.heading_deg,
                    tolerance,
                ) {
                    TurnDirection::Left => {
                        let _ = actions.push(NavAction::Steer(RudderCommand::Left));
                    }
                    TurnDirection::Right => {
                        let _ = actions.push(NavAction::Steer(RudderCommand::Right));
                    }
                    TurnDirection::Straight => {
                        let _ = actions.push(NavAction::Steer(RudderCommand::Center));
                        let _ = actions.push(NavAction::Throttle(ThrottleCommand::Forward100));
                    }
                }

                if self.nav_info.distance_m <= self.params.arrival_distance_m {
                    let _ = actions.push(NavAction::Throttle(ThrottleCommand::Stop));
                    self.state = NavState::SetNextWaypoint;
                }
            }

            NavState::Stop => {
                let _ = actions.push(NavAction::Throttle(ThrottleCommand::Stop));
                if !inputs.fix.locked {
                    self.state = NavState::WaitForRelock;
                } else {
                    self.state = NavState::Idle;
                }
            }

            NavState::Idle => {
                // Holding for an external resume().
            }
        }

        actions
    }

    fn update_range_and_bearing(
        &mut self,
        inputs: &TickInputs,
        table: &WaypointTable,
        geo: &dyn GeoModel,
    ) {
        if let Some(wp) = table.get(self.target) {
            self.nav_info.bearing_deg = geo.course_to(
                inputs.fix.latitude,
                inputs.fix.longitude,
                wp.lat,
                wp.lon,
            );
            self.nav_info.distance_m = geo.distance_between(
                inputs.fix.latitude,
                inputs.fix.longitude,
                wp.lat,
                wp.lon,
            );
        }
    }
}
