use embedded_hal_async::i2c::I2c;
use log::{debug, error};

use super::{Sensor, SensorError};
use crate::temperature::{Celsius, RawReading};

/// Address with A0 and A1 tied high.
pub const ADT7420_DEFAULT_ADDRESS: u8 = 0x4B;

/// Manufacturer ID and silicon revision read back from [`Register::Id`].
pub const ADT7420_DEVICE_ID: u8 = 0xCB;

#[derive(Clone, Copy)]
enum Register {
    TemperatureMsb = 0x00,
    Id = 0x0B,
}

/// ADT7420 temperature sensor on an async I2C bus.
pub struct Adt7420<I> {
    i2c: I,
    address: u8,
    temperature_register: u8,
}

impl<I: I2c> Adt7420<I> {
    /// Creates a new instance of the sensor, taking ownership of the bus handle.
    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            temperature_register: Register::TemperatureMsb as u8,
        }
    }

    /// Override the register selected before each 2-byte temperature read.
    pub fn with_temperature_register(mut self, register: u8) -> Self {
        self.temperature_register = register;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Select the temperature register and read its two bytes.
    pub async fn read_raw(&mut self) -> Result<RawReading, SensorError> {
        let mut data = [0u8; 2];
        self.i2c
            .write_read(self.address, &[self.temperature_register], &mut data)
            .await
            .map_err(|e| {
                error!("ADT7420 temperature read at {:#04x} failed: {:?}", self.address, e);
                SensorError::ReadFailed {
                    sensor: Self::NAME,
                    operation: "read temperature register",
                    details: "I2C communication error or sensor not responding",
                }
            })?;
        let raw = RawReading::from_be_bytes(data);
        debug!("ADT7420 raw reading {:#06x}", raw.0);
        Ok(raw)
    }

    /// Reads the ID register and checks it against [`ADT7420_DEVICE_ID`].
    pub async fn device_id(&mut self) -> Result<u8, SensorError> {
        let mut id = [0u8];
        self.i2c
            .write_read(self.address, &[Register::Id as u8], &mut id)
            .await
            .map_err(|e| {
                error!("ADT7420 id read at {:#04x} failed: {:?}", self.address, e);
                SensorError::ReadFailed {
                    sensor: Self::NAME,
                    operation: "read id register",
                    details: "I2C communication error or sensor not responding",
                }
            })?;

        if id[0] != ADT7420_DEVICE_ID {
            return Err(SensorError::UnexpectedDevice {
                sensor: Self::NAME,
                expected: ADT7420_DEVICE_ID,
                found: id[0],
            });
        }
        Ok(id[0])
    }
}

impl<I: I2c> Sensor for Adt7420<I> {
    const NAME: &'static str = "ADT7420";

    async fn read_once(&mut self) -> Result<Celsius, SensorError> {
        self.read_raw().await.map(Celsius::from)
    }
}
