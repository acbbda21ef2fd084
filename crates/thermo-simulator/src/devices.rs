//! Simulated hardware for the desktop build.

use std::time::Duration;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use log::debug;

use thermo_core::buttons::ButtonInput;
use thermo_core::display::{BLANK_PATTERN, DASH_PATTERN, HEX_PATTERNS, NUM_DIGITS, SegmentDisplay};
use thermo_core::sensors::ADT7420_DEVICE_ID;

const TEMPERATURE_REGISTER: u8 = 0x00;
const ID_REGISTER: u8 = 0x0B;

/// Every Nth transaction fails with a NACK.
const FAULT_EVERY: u32 = 37;

/// Transactions during which the sensor stops answering entirely.
const OUTAGE: std::ops::Range<u32> = 400..430;

/// Polls between button code changes.
const POLLS_PER_BUTTON: u32 = 25;

// ---------------------------------------------------------------------------
// Sensor
// ---------------------------------------------------------------------------

/// ADT7420 answering on a fake I2C bus with a slowly varying temperature.
pub struct SimulatedAdt7420 {
    address: u8,
    pointer: u8,
    transactions: u32,
}

impl SimulatedAdt7420 {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            pointer: TEMPERATURE_REGISTER,
            transactions: 0,
        }
    }

    /// Temperature in °C after `transactions` bus transactions.
    fn temperature(&self) -> f64 {
        let t = f64::from(self.transactions) / 10.0;
        // Swings from about -12 °C up past 110 °C so every scale gets shown.
        50.0 + 60.0 * (t / 15.0).sin() + 2.0 * (t / 1.3).cos()
    }

    /// Encode a temperature as the sensor's 13-bit left-aligned register word.
    fn encode(celsius: f64) -> [u8; 2] {
        let counts = (celsius * 16.0).round() as i32;
        let word = ((counts & 0x1FFF) as u16) << 3;
        word.to_be_bytes()
    }

    fn register_bytes(&self, register: u8) -> [u8; 2] {
        match register {
            TEMPERATURE_REGISTER => Self::encode(self.temperature()),
            ID_REGISTER => [ADT7420_DEVICE_ID, 0x00],
            _ => [0x00, 0x00],
        }
    }
}

impl ErrorType for SimulatedAdt7420 {
    type Error = ErrorKind;
}

impl I2c for SimulatedAdt7420 {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;

        if address != self.address
            || OUTAGE.contains(&self.transactions)
            || self.transactions % FAULT_EVERY == 0
        {
            debug!("Simulated NACK on transaction {}", self.transactions);
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    if let Some(register) = bytes.first() {
                        self.pointer = *register;
                    }
                }
                Operation::Read(buffer) => {
                    let bytes = self.register_bytes(self.pointer);
                    for (slot, byte) in buffer.iter_mut().zip(bytes) {
                        *slot = byte;
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

/// Steps through every button code in turn.
#[derive(Default)]
pub struct ScriptedButtons {
    reads: u32,
}

impl ButtonInput for ScriptedButtons {
    fn read(&mut self) -> u8 {
        let code = ((self.reads / POLLS_PER_BUTTON) % 4) as u8;
        self.reads += 1;
        code
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Prints each completed frame, leftmost position first.
pub struct TerminalDisplay {
    patterns: [u8; NUM_DIGITS],
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self {
            patterns: [BLANK_PATTERN; NUM_DIGITS],
        }
    }
}

impl TerminalDisplay {
    fn character(pattern: u8) -> char {
        match pattern {
            BLANK_PATTERN => ' ',
            DASH_PATTERN => '-',
            _ => HEX_PATTERNS
                .iter()
                .position(|p| *p == pattern)
                .and_then(|digit| char::from_digit(digit as u32, 16))
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or('?'),
        }
    }

    /// Render the current contents as text, position 7 on the left.
    pub fn render(&self, decimal_points: u8) -> String {
        let mut line = String::with_capacity(NUM_DIGITS * 2);
        for position in (0..NUM_DIGITS).rev() {
            line.push(Self::character(self.patterns[position]));
            if decimal_points & (1 << position) != 0 {
                line.push('.');
            }
        }
        line
    }
}

impl SegmentDisplay for TerminalDisplay {
    type Error = core::convert::Infallible;

    fn write_glyph(&mut self, pattern: u8, position: usize) -> Result<(), Self::Error> {
        if let Some(slot) = self.patterns.get_mut(position) {
            *slot = pattern;
        }
        Ok(())
    }

    /// Called last for every frame, so this is where the frame is printed.
    fn set_decimal_points(&mut self, mask: u8) -> Result<(), Self::Error> {
        println!("[{}]", self.render(mask));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Blocking delay; the simulator runs on a single thread with `block_on`.
pub struct StdDelay;

impl DelayNs for StdDelay {
    async fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}
