//! 8-digit 7-segment display: driver seam, frame model and layout engine
//!
//! Rendering is split in two. The layout engine ([`layout`]) is pure and
//! produces a [`DisplayFrame`]; [`DisplayFrame::write_to`] then pushes the
//! frame through a [`SegmentDisplay`] driver.

pub mod format;
pub mod frame;
pub mod layout;

use thiserror_no_std::Error;

pub use format::{Bank, FormattedValue, Scale, digit_count, format};
pub use frame::{DisplayFrame, Glyph};
pub use layout::{render_dual, render_error, render_off, render_single};

/// Number of digit positions on the display. Position 0 is the rightmost.
pub const NUM_DIGITS: usize = 8;

/// Segment pattern with every segment off (active low).
pub const BLANK_PATTERN: u8 = 0xFF;

/// Segment pattern lighting only the middle bar.
pub const DASH_PATTERN: u8 = 0xBF;

/// Hex value of the unit glyph for degrees Celsius.
pub const CELSIUS_GLYPH: u8 = 0xC;

/// Hex value of the unit glyph for degrees Fahrenheit.
pub const FAHRENHEIT_GLYPH: u8 = 0xF;

/// Active-low `dp g f e d c b a` patterns for the hex digits 0-F.
pub const HEX_PATTERNS: [u8; 16] = [
    0xC0, 0xF9, 0xA4, 0xB0, 0x99, 0x92, 0x82, 0xF8, // 0-7
    0x80, 0x90, 0x88, 0x83, 0xC6, 0xA1, 0x86, 0x8E, // 8-F
];

/// Errors raised while pushing a frame to the display driver.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    #[error("failed to write glyph at position {position}")]
    GlyphWrite { position: usize },
    #[error("failed to set decimal points")]
    DecimalPoints,
}

/// Driver for a multiplexed 7-segment display array.
pub trait SegmentDisplay {
    type Error: core::fmt::Debug;

    /// Write a raw segment pattern to one digit position (0..=7).
    fn write_glyph(&mut self, pattern: u8, position: usize) -> Result<(), Self::Error>;

    /// Set the decimal point mask; bit `n` lights the point of position `n`.
    fn set_decimal_points(&mut self, mask: u8) -> Result<(), Self::Error>;

    /// Translate a hex digit into its segment pattern.
    fn glyph_pattern(&self, value: u8) -> u8 {
        HEX_PATTERNS[(value & 0x0F) as usize]
    }
}
