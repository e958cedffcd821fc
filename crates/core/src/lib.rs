//! waypilot_core - Pure no_std navigation logic for the waypilot autopilot
//!
//! This crate contains the platform-agnostic part of the boat controller:
//! everything here is testable on the host without hardware or threads.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Geometry and time injected via traits
//!
//! # Modules
//!
//! - [`fix`]: GPS fix snapshot type shared between acquisition and control
//! - [`mission`]: Waypoint storage with cyclic target cursor
//! - [`navigation`]: Great-circle geometry and the bearing-to-turn decision
//! - [`sequencer`]: The nine-state navigation state machine
//! - [`filters`]: Heading EMA and running-average smoothing helpers
//! - [`params`]: Navigation parameter defaults and validation
//! - [`traits`]: Time source abstraction (with a mock for tests)

#![no_std]

pub mod filters;
pub mod fix;
pub mod mission;
pub mod navigation;
pub mod params;
pub mod sequencer;
pub mod traits;

pub use fix::{FixTime, GpsFix};
pub use mission::{Waypoint, WaypointTable, MAX_WAYPOINTS};
pub use navigation::{
    direction_to_bearing, GeoModel, Haversine, NavAction, NavInfo, RudderCommand, ThrottleCommand,
    TurnDirection,
};
pub use params::NavParams;
pub use sequencer::{NavSequencer, NavState, TickInputs};
