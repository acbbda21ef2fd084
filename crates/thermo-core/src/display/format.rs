//! Fixed-point scaling and decimal digit decomposition
//!
//! Values with a three-digit integer part keep one decimal place, everything
//! else keeps two. The integer part is taken by truncation, so negative
//! values always fall on the hundredths side of the threshold.

use heapless::Vec;

/// Integer part at which a value switches from hundredths to tenths.
const THREE_DIGIT_THRESHOLD: i32 = 100;

/// A `u32` magnitude has at most ten decimal digits.
pub const MAX_DIGITS: usize = 10;

/// Absorbs binary representation error before truncation, so that `73.2`
/// scales to `7320` rather than `7319`. Sensor values are multiples of
/// 1/16 and never come this close to the next integer.
const SCALE_TOLERANCE: f64 = 1e-3;

/// Smallest magnitude that no longer fits the four digits left beside the
/// unit glyph.
const SCALE_LIMIT: u32 = 10_000;

/// Number of decimal places kept when a value is scaled to an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// One decimal place, value × 10.
    Tenths,
    /// Two decimal places, value × 100.
    Hundredths,
}

/// Which nibble of the decimal point mask a value is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    /// Positions 4-7: single mode, and Fahrenheit in dual mode.
    High,
    /// Positions 0-3: Celsius in dual mode.
    Low,
}

impl Scale {
    pub fn for_value(value: f32) -> Self {
        if value as i32 >= THREE_DIGIT_THRESHOLD {
            Scale::Tenths
        } else {
            Scale::Hundredths
        }
    }

    pub const fn factor(self) -> u32 {
        match self {
            Scale::Tenths => 10,
            Scale::Hundredths => 100,
        }
    }

    /// Decimal point mask bit for this scale.
    pub const fn decimal_point(self, bank: Bank) -> u8 {
        match (self, bank) {
            (Scale::Tenths, Bank::High) => 0x20,
            (Scale::Hundredths, Bank::High) => 0x40,
            (Scale::Tenths, Bank::Low) => 0x02,
            (Scale::Hundredths, Bank::Low) => 0x04,
        }
    }
}

/// A temperature scaled to an integer and split into decimal digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedValue {
    /// Absolute value × [`Scale::factor`], truncated.
    pub magnitude: u32,
    pub scale: Scale,
    /// Set for values below zero. The sign is not rendered.
    pub negative: bool,
    digits: Vec<u8, MAX_DIGITS>,
}

impl FormattedValue {
    /// Decimal digits, least significant first.
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    pub const fn decimal_point(&self, bank: Bank) -> u8 {
        self.scale.decimal_point(bank)
    }
}

/// Scale `value` for display and decompose it into digits.
pub fn format(value: f32) -> FormattedValue {
    let scale = Scale::for_value(value);
    let negative = value < 0.0;
    let absolute = if negative { -f64::from(value) } else { f64::from(value) };
    let scaled = absolute * f64::from(scale.factor());

    // The tolerance must not carry a value out of its scale's digit width.
    let truncated = scaled as u32;
    let adjusted = (scaled + SCALE_TOLERANCE) as u32;
    let magnitude = if truncated < SCALE_LIMIT && adjusted >= SCALE_LIMIT {
        truncated
    } else {
        adjusted
    };

    let mut digits = Vec::new();
    let mut rest = magnitude;
    for _ in 0..digit_count(magnitude) {
        if digits.push((rest % 10) as u8).is_err() {
            break;
        }
        rest /= 10;
    }

    FormattedValue {
        magnitude,
        scale,
        negative,
        digits,
    }
}

/// Number of decimal digits in `value`; zero counts as one digit.
pub fn digit_count(value: u32) -> usize {
    let mut digits = 1;
    let mut value = value;
    while value / 10 != 0 {
        digits += 1;
        value /= 10;
    }
    digits
}
