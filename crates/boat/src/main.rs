//! waypilot - GPS waypoint autopilot runtime
//!
//! Brings up the GPS receiver, compass, and servo bridge, then runs the
//! acquisition thread and the navigation control loop until Ctrl-C.

use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use waypilot_boat::acquisition::AcquisitionTask;
use waypilot_boat::clock::MonotonicClock;
use waypilot_boat::config::{parse_waypoint, BoatConfig, DEFAULT_DECLINATION_DEG};
use waypilot_boat::control::ControlLoop;
use waypilot_boat::devices::actuator::{reg, BRIDGE_ADDR, EXPECTED_VERSION};
use waypilot_boat::devices::compass::HMC6343_ADDR;
use waypilot_boat::devices::{Hmc6343, NmeaFixSource, ServoBridge};
use waypilot_boat::platform::{SerialUart, SimI2c, UartConfig};
use waypilot_boat::shared::{SharedFix, SharedStatus, ShutdownToken};

#[derive(Parser, Debug)]
#[command(name = "waypilot", about = "GPS waypoint autopilot for a surface boat")]
struct Args {
    /// GPS receiver serial device
    #[arg(long, default_value = "/dev/ttyAMA0")]
    port: String,

    /// GPS baud rate
    #[arg(long, default_value_t = 4800)]
    baud: u32,

    /// Mission waypoint as "lat,lon" decimal degrees (repeat; at least 2).
    /// The first is home.
    #[arg(long = "waypoint", value_parser = clap_waypoint, required = true, num_args = 1..)]
    waypoints: Vec<waypilot_core::Waypoint>,

    /// Navigate home to the configured first waypoint instead of capturing
    /// home from the first stable fix
    #[arg(long)]
    fixed_home: bool,

    /// Magnetic declination in degrees, east positive
    #[arg(long, default_value_t = DEFAULT_DECLINATION_DEG)]
    declination: f32,

    /// Bearing tolerance in degrees
    #[arg(long, default_value_t = 10.0)]
    tolerance: f32,

    /// Arrival distance in meters
    #[arg(long, default_value_t = 2.0)]
    arrival: f32,

    /// Seconds to let the fix settle after first lock
    #[arg(long, default_value_t = 1)]
    stabilize: u32,

    /// Mirror rudder values for an inverted linkage
    #[arg(long)]
    reverse_rudder: bool,
}

fn clap_waypoint(s: &str) -> Result<waypilot_core::Waypoint, String> {
    parse_waypoint(s).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut config = BoatConfig {
        serial_path: args.port,
        baud_rate: args.baud,
        waypoints: args.waypoints,
        fixed_home: args.fixed_home,
        declination_deg: args.declination,
        ..BoatConfig::default()
    };
    config.nav.bearing_tolerance_deg = args.tolerance;
    config.nav.arrival_distance_m = args.arrival;
    config.nav.stabilize_secs = args.stabilize;
    config.servo.rudder_reversed = args.reverse_rudder;

    let table = config.waypoint_table().context("configuration")?;
    info!(
        waypoints = table.len(),
        fixed_home = config.fixed_home,
        "mission loaded"
    );

    // GPS on the serial port; compass and servo bridge on the bench bus
    // simulation until a hardware I2C backend is wired in.
    let uart = SerialUart::open(
        &config.serial_path,
        UartConfig {
            baud_rate: config.baud_rate,
            ..UartConfig::default()
        },
    )
    .context("gps serial port")?;
    let gps = NmeaFixSource::new(uart);

    let mut compass_bus = SimI2c::new();
    compass_bus.attach(HMC6343_ADDR);
    let compass = Hmc6343::new(compass_bus, config.declination_deg);

    let mut bridge_bus = SimI2c::new();
    bridge_bus.set_register(BRIDGE_ADDR, reg::VERSION, EXPECTED_VERSION);
    let mut bridge = ServoBridge::new(bridge_bus, config.servo);
    bridge.probe().context("servo bridge")?;
    // Status LED on for the life of the mission
    bridge.set_led(true).context("servo bridge")?;

    let fix = SharedFix::new();
    let status = SharedStatus::new();
    let shutdown = ShutdownToken::new();

    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("shutdown requested");
            shutdown.request();
        })
        .context("signal handler")?;
    }

    let acquisition = AcquisitionTask::new(gps, fix.clone(), shutdown.clone())
        .with_poll_interval(Duration::from_millis(config.acquisition_interval_ms));
    let acquisition_thread = thread::spawn(move || acquisition.run());

    // Status reporter: one line a second while the mission runs
    let status_thread = {
        let status = status.clone();
        let shutdown = shutdown.clone();
        thread::spawn(move || {
            while !shutdown.is_requested() {
                let snap = status.snapshot();
                info!(
                    state = snap.state_name,
                    target = snap.target_index,
                    distance_m = snap.nav.distance_m,
                    bearing = snap.nav.bearing_deg,
                    heading = snap.nav.heading_deg,
                    lat = snap.fix.latitude,
                    lon = snap.fix.longitude,
                    locked = snap.fix.locked,
                    "status"
                );
                thread::sleep(Duration::from_secs(1));
            }
        })
    };

    let control = ControlLoop::new(
        config.nav,
        table,
        compass,
        bridge,
        MonotonicClock::new(),
        fix,
        status,
        shutdown.clone(),
    )
    .with_tick_interval(Duration::from_millis(config.tick_interval_ms));

    let result = control.run();

    shutdown.request();
    let _ = acquisition_thread.join();
    let _ = status_thread.join();

    result.context("control loop")?;
    info!("shutdown complete");
    Ok(())
}
