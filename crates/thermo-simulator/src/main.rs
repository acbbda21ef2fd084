//! Desktop simulator for the thermo-sseg temperature display.
//!
//! Drives `thermo-core`'s [`Monitor`] against a simulated ADT7420 on a fake
//! async I2C bus, a scripted button source and a terminal display that
//! prints each frame as it is written.
//!
//! ```text
//! thermo-simulator [config.toml] [polls]
//! ```
//!
//! With no poll count the monitor runs until interrupted.

mod devices;

use std::error::Error;
use std::fs;
use std::num::ParseIntError;

use embassy_futures::block_on;
use log::{error, info, warn};

use thermo_core::config::MonitorConfig;
use thermo_core::monitor::Monitor;

use devices::{ScriptedButtons, SimulatedAdt7420, StdDelay, TerminalDisplay};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Parse a TOML document; missing fields take their defaults.
fn parse_config(text: &str) -> Result<MonitorConfig, toml::de::Error> {
    toml::from_str(text)
}

fn load_config(path: &str) -> Result<MonitorConfig, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_config(&text)?)
}

fn parse_polls(arg: &str) -> Result<u32, ParseIntError> {
    arg.trim().parse()
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match load_config(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path);
                config
            }
            Err(e) => {
                error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => MonitorConfig::default(),
    };
    let polls = match args.next() {
        Some(arg) => match parse_polls(&arg) {
            Ok(count) => Some(count),
            Err(e) => {
                error!("Invalid poll count {:?}: {}", arg, e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    info!("Starting thermo-sseg simulator");
    info!("{:?}", config);

    let bus = SimulatedAdt7420::new(config.sensor_address);
    let mut delay = StdDelay;
    let mut monitor = Monitor::with_adt7420(
        bus,
        ScriptedButtons::default(),
        TerminalDisplay::default(),
        config,
    );

    block_on(async {
        match monitor.sensor_mut().device_id().await {
            Ok(id) => info!("Found ADT7420 (id {:#04x})", id),
            Err(e) => warn!("Sensor probe failed: {}", e),
        }

        match polls {
            Some(count) => monitor.run_for(&mut delay, count).await,
            None => monitor.run(&mut delay).await,
        }
    });

    info!("Simulator exiting");
}
