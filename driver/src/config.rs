use crate::flags::{Font, FunctionSet, Lines};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wiring of the LCD control lines to the expander pins.
///
/// Each field is the expander pin number (0–3) driving that line. The data lines D4–D7 of the
/// controller are always wired to pins P4–P7, so the control lines have to share the low nibble.
///
/// The default is the wiring of the common PCF8574 backpack: RS on P0, RW on P1, E on P2 and the
/// backlight transistor on P3.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinMap {
    pub register_select: u8,
    pub read_write: u8,
    pub enable: u8,
    pub backlight: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        PinMap {
            register_select: 0,
            read_write: 1,
            enable: 2,
            backlight: 3,
        }
    }
}

impl PinMap {
    pub fn register_select_mask(&self) -> u8 {
        1 << self.register_select
    }

    pub fn read_write_mask(&self) -> u8 {
        1 << self.read_write
    }

    pub fn enable_mask(&self) -> u8 {
        1 << self.enable
    }

    pub fn backlight_mask(&self) -> u8 {
        1 << self.backlight
    }

    /// Checks that every control line sits on its own pin of the low nibble.
    pub fn is_valid(&self) -> bool {
        let pins = [
            self.register_select,
            self.read_write,
            self.enable,
            self.backlight,
        ];
        if pins.iter().any(|&pin| pin > 3) {
            return false;
        }
        let combined = pins.iter().fold(0u8, |acc, &pin| acc | (1 << pin));
        combined == 0b1111
    }
}

/// Configuration of a display session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LcdConfig {
    /// 7-bit I²C address of the expander. PCF8574 boards use 0x20–0x27, PCF8574A boards 0x38–0x3F.
    pub address: u8,
    pub columns: u8,
    pub rows: u8,
    pub lines: Lines,
    pub font: Font,
    pub pins: PinMap,
}

impl Default for LcdConfig {
    fn default() -> Self {
        LcdConfig {
            address: 0x27,
            columns: 16,
            rows: 2,
            lines: Lines::Two,
            font: Font::Dots5x8,
            pins: PinMap::default(),
        }
    }
}

impl LcdConfig {
    /// Largest number of rows the DDRAM row offset table covers.
    pub const MAX_ROWS: u8 = 4;
    /// DDRAM holds 40 characters per controller line.
    pub const MAX_COLUMNS: u8 = 40;
    /// Rows 2 and 3 continue lines 0 and 1, so a 4-row module can be at most half a line wide.
    pub const MAX_COLUMNS_FOLDED: u8 = 20;

    /// Configuration for a module of the given size with the default backpack wiring.
    pub fn new(address: u8, columns: u8, rows: u8) -> Self {
        LcdConfig {
            address,
            columns,
            rows,
            ..Default::default()
        }
    }

    pub fn function_set(&self) -> FunctionSet {
        FunctionSet {
            lines: self.lines,
            font: self.font,
        }
    }

    /// Checks the address, the geometry, the font and the pin map. The 5x10 font only exists in
    /// one-line mode.
    pub fn is_valid(&self) -> bool {
        let max_columns = if self.rows > 2 {
            Self::MAX_COLUMNS_FOLDED
        } else {
            Self::MAX_COLUMNS
        };

        self.address <= 0x7F
            && (1..=Self::MAX_ROWS).contains(&self.rows)
            && (1..=max_columns).contains(&self.columns)
            && !(self.font == Font::Dots5x10 && self.lines == Lines::Two)
            && self.pins.is_valid()
    }
}
