use log::error;

use super::{BLANK_PATTERN, DASH_PATTERN, DisplayError, NUM_DIGITS, SegmentDisplay};

/// Contents of one digit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Glyph {
    #[default]
    Blank,
    /// Hex digit 0-F, translated by the driver's lookup table.
    Hex(u8),
    Dash,
}

impl Glyph {
    /// Segment pattern for this glyph on the given driver.
    pub fn pattern<D: SegmentDisplay + ?Sized>(self, display: &D) -> u8 {
        match self {
            Glyph::Blank => BLANK_PATTERN,
            Glyph::Hex(value) => display.glyph_pattern(value),
            Glyph::Dash => DASH_PATTERN,
        }
    }
}

/// A complete display image: one glyph per position plus the decimal point mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayFrame {
    pub glyphs: [Glyph; NUM_DIGITS],
    pub decimal_points: u8,
}

impl DisplayFrame {
    /// Frame with every position blank and no decimal points lit.
    pub const fn blank() -> Self {
        Self {
            glyphs: [Glyph::Blank; NUM_DIGITS],
            decimal_points: 0,
        }
    }

    pub fn glyph(&self, position: usize) -> Option<Glyph> {
        self.glyphs.get(position).copied()
    }

    /// Push every position and then the decimal point mask to the driver.
    ///
    /// Stops at the first failed write; the caller decides whether to retry
    /// on the next poll.
    pub fn write_to<D: SegmentDisplay>(&self, display: &mut D) -> Result<(), DisplayError> {
        for (position, glyph) in self.glyphs.iter().enumerate() {
            let pattern = glyph.pattern(&*display);
            display.write_glyph(pattern, position).map_err(|e| {
                error!("Display glyph write at position {} failed: {:?}", position, e);
                DisplayError::GlyphWrite { position }
            })?;
        }

        display
            .set_decimal_points(self.decimal_points)
            .map_err(|e| {
                error!("Display decimal point write failed: {:?}", e);
                DisplayError::DecimalPoints
            })
    }
}
