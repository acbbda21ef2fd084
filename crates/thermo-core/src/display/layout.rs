//! Frame layouts for the three display modes
//!
//! Every function here is pure: the returned frame depends only on the
//! arguments. Digits are always written least significant first, moving
//! left from the starting position.

use log::warn;

use super::format::{Bank, format};
use super::{CELSIUS_GLYPH, DisplayFrame, FAHRENHEIT_GLYPH, Glyph, NUM_DIGITS};
use crate::temperature::Unit;

/// First position of the Fahrenheit half in dual mode.
const DUAL_HIGH_START: isize = 4;

fn unit_glyph(unit: Unit) -> Glyph {
    match unit {
        Unit::Celsius => Glyph::Hex(CELSIUS_GLYPH),
        Unit::Fahrenheit => Glyph::Hex(FAHRENHEIT_GLYPH),
    }
}

/// Write `glyph` at `position`, dropping it if it falls off the display.
fn place(frame: &mut DisplayFrame, position: isize, glyph: Glyph) {
    match usize::try_from(position)
        .ok()
        .and_then(|p| frame.glyphs.get_mut(p))
    {
        Some(slot) => *slot = glyph,
        None => warn!("Dropping {:?} outside the display at position {}", glyph, position),
    }
}

/// Write `digits` at increasing positions starting from `start`.
fn place_digits(frame: &mut DisplayFrame, start: isize, digits: &[u8]) {
    for (offset, digit) in digits.iter().enumerate() {
        place(frame, start + offset as isize, Glyph::Hex(*digit));
    }
}

/// One reading against the left edge (position 7), with its unit glyph on
/// its right.
///
/// Positions right of the unit glyph are blanked.
pub fn render_single(value: f32, unit: Unit) -> DisplayFrame {
    let formatted = format(value);
    let used = formatted.digit_count() + 1;
    let unit_position = NUM_DIGITS as isize - used as isize;

    let mut frame = DisplayFrame::blank();
    place(&mut frame, unit_position, unit_glyph(unit));
    place_digits(&mut frame, unit_position + 1, formatted.digits());
    frame.decimal_points = formatted.decimal_point(Bank::High);
    frame
}

/// Celsius in the right half, Fahrenheit in the left half.
///
/// A reading longer than four digits runs into the other half; Fahrenheit is
/// written last and wins.
pub fn render_dual(fahrenheit: f32, celsius: f32) -> DisplayFrame {
    let fahrenheit = format(fahrenheit);
    let celsius = format(celsius);

    let mut frame = render_off();
    place_digits(&mut frame, 0, celsius.digits());
    place_digits(&mut frame, DUAL_HIGH_START, fahrenheit.digits());
    frame.decimal_points = fahrenheit.decimal_point(Bank::High) | celsius.decimal_point(Bank::Low);
    frame
}

pub fn render_off() -> DisplayFrame {
    DisplayFrame::blank()
}

/// Shown after the sensor has failed repeatedly.
pub fn render_error() -> DisplayFrame {
    DisplayFrame {
        glyphs: [Glyph::Dash; NUM_DIGITS],
        decimal_points: 0,
    }
}
