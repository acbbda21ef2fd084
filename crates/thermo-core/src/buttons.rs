//! Button mode selection

/// Only the two low bits of the debounced button code are meaningful.
const BUTTON_CODE_MASK: u8 = 0b11;

/// Source of debounced button state.
pub trait ButtonInput {
    /// Current debounced button code.
    fn read(&mut self) -> u8;
}

/// What the display shows on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Upper button (code 0).
    Celsius,
    /// Right button (code 1).
    Off,
    /// Down button (code 2).
    Fahrenheit,
    /// Left button (code 3).
    Both,
}

impl DisplayMode {
    pub const fn from_code(code: u8) -> Self {
        match code & BUTTON_CODE_MASK {
            0 => DisplayMode::Celsius,
            1 => DisplayMode::Off,
            2 => DisplayMode::Fahrenheit,
            _ => DisplayMode::Both,
        }
    }
}

impl From<u8> for DisplayMode {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}
