mod adt7420;

use thiserror_no_std::Error;

use crate::temperature::Celsius;

pub use adt7420::{ADT7420_DEFAULT_ADDRESS, ADT7420_DEVICE_ID, Adt7420};

/// Errors surfaced by the temperature bus.
///
/// HAL errors are logged where they are mapped and are not carried here, so
/// the poll loop can handle every sensor the same way.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor}: {operation} failed: {details}")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
        details: &'static str,
    },
    #[error("{sensor}: no valid reading after {attempts} attempts")]
    RetriesExhausted { sensor: &'static str, attempts: u8 },
    #[error("{sensor}: unexpected device id {found:#04x} (expected {expected:#04x})")]
    UnexpectedDevice {
        sensor: &'static str,
        expected: u8,
        found: u8,
    },
}

/// Trait for temperature sensors polled by the monitor.
pub trait Sensor {
    /// Short name used in log lines and errors.
    const NAME: &'static str;

    /// Perform a single bus transaction and decode the result.
    fn read_once(&mut self) -> impl Future<Output = Result<Celsius, SensorError>>;

    /// Read the sensor, retrying failed transactions up to `attempts` times.
    fn read(&mut self, attempts: u8) -> impl Future<Output = Result<Celsius, SensorError>> {
        async move {
            let attempts = attempts.max(1);
            for attempt in 1..=attempts {
                match self.read_once().await {
                    Ok(celsius) => return Ok(celsius),
                    Err(e) => {
                        log::warn!(
                            "{} read attempt {}/{} failed: {}",
                            Self::NAME,
                            attempt,
                            attempts,
                            e
                        );
                    }
                }
            }
            Err(SensorError::RetriesExhausted {
                sensor: Self::NAME,
                attempts,
            })
        }
    }
}
