use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::sensors::ADT7420_DEFAULT_ADDRESS;

/// Runtime settings for the monitor.
///
/// Every field has a default, so a partial document only overrides what it
/// names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MonitorConfig {
    /// 7-bit I2C address of the temperature sensor.
    pub sensor_address: u8,
    /// Register selected before each 2-byte temperature read.
    pub temperature_register: u8,
    /// Delay between polls.
    pub poll_interval_ms: u32,
    /// Bus transactions per poll before the reading is given up.
    pub read_attempts: u8,
    /// Consecutive failed polls before the error pattern is shown.
    pub failure_threshold: u8,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sensor_address: ADT7420_DEFAULT_ADDRESS,
            temperature_register: 0x00,
            poll_interval_ms: 100,
            read_attempts: 3,
            failure_threshold: 5,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.poll_interval_ms))
    }
}
