//! Temperature units and the ADT7420 fixed-point decode
//!
//! The sensor reports a 13-bit two's-complement value at 1/16 °C per count,
//! left-aligned in a 16-bit big-endian word with three status bits below it.

/// Raw 16-bit word as read from the temperature register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReading(pub u16);

impl RawReading {
    /// Combine the two register bytes, most significant first.
    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    /// Sign flag (bit 15).
    pub const fn is_negative(self) -> bool {
        self.0 & 0x8000 != 0
    }

    /// The 13-bit value with the status bits shifted out.
    pub const fn counts(self) -> u16 {
        self.0 >> 3
    }
}

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Celsius(pub f32);

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Fahrenheit(pub f32);

/// Unit shown next to a single reading.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    Fahrenheit,
}

impl From<RawReading> for Celsius {
    fn from(raw: RawReading) -> Self {
        let counts = raw.counts();
        if raw.is_negative() {
            Self((counts as i32 - 8192) as f32 / 16.0)
        } else {
            Self(counts as f32 / 16.0)
        }
    }
}

impl From<Celsius> for Fahrenheit {
    fn from(celsius: Celsius) -> Self {
        Self((celsius.0 * 9.0) / 5.0 + 32.0)
    }
}

/// Decode the two temperature register bytes into degrees Celsius.
pub fn decode(bytes: [u8; 2]) -> Celsius {
    Celsius::from(RawReading::from_be_bytes(bytes))
}
