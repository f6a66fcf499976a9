//! Flag registers of the HD44780 instruction set.
//!
//! The controller has no instruction that sets a single flag. Every entry mode, display control or
//! function set command carries all of its flags, so the session keeps them in these structs and
//! re-encodes the whole byte on every change.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction the text flows in, i.e. whether the address counter is incremented or decremented
/// after each character.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Entry mode set register.
///
/// Command: `000001IS`.
/// `I` is `1` when the text flows left to right (address increment), `0` for right to left.
/// `S` is `1` when the whole display shifts with every character written (autoscroll).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EntryMode {
    pub direction: TextDirection,
    pub autoscroll: bool,
}

impl EntryMode {
    pub const ENTRY_LEFT: u8 = 0b00000010;
    pub const SHIFT_INCREMENT: u8 = 0b00000001;

    /// Converts the entry mode to the flag bits of the command.
    pub fn to_mask(&self) -> u8 {
        let mut mask = 0;
        if self.direction == TextDirection::LeftToRight {
            mask |= Self::ENTRY_LEFT;
        }
        if self.autoscroll {
            mask |= Self::SHIFT_INCREMENT;
        }
        mask
    }
}

/// Display on/off control register.
///
/// Command: `00001DCB`.
/// `D` is `1` for display on, `C` for the underline cursor, `B` for the blinking block cursor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DisplayControl {
    pub display_on: bool,
    pub cursor_on: bool,
    pub blink_on: bool,
}

impl Default for DisplayControl {
    fn default() -> Self {
        DisplayControl {
            display_on: true,
            cursor_on: false,
            blink_on: false,
        }
    }
}

impl DisplayControl {
    pub const DISPLAY_ON: u8 = 0b00000100;
    pub const CURSOR_ON: u8 = 0b00000010;
    pub const BLINK_ON: u8 = 0b00000001;

    /// Converts the display control to the flag bits of the command.
    pub fn to_mask(&self) -> u8 {
        let mut mask = 0;
        if self.display_on {
            mask |= Self::DISPLAY_ON;
        }
        if self.cursor_on {
            mask |= Self::CURSOR_ON;
        }
        if self.blink_on {
            mask |= Self::BLINK_ON;
        }
        mask
    }
}

/// Number of display lines the controller multiplexes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Lines {
    One,
    /// Two lines, also used for 4-line modules which are wired as two folded lines.
    #[default]
    Two,
}

/// Character font.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Font {
    #[default]
    Dots5x8,
    /// 5x10 dots. Only available in one-line mode.
    Dots5x10,
}

/// Function set register. Sent once during initialization.
///
/// Command: `001DNF??`.
/// `D` is `1` for the 8-bit bus, `0` for the 4-bit bus. The expander only wires D4–D7, so this
/// driver always uses the 4-bit bus.
/// `N` is `1` for two lines, `F` is `1` for the 5x10 font.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FunctionSet {
    pub lines: Lines,
    pub font: Font,
}

impl FunctionSet {
    pub const LINE_2: u8 = 0b00001000;
    pub const DOTS_5X10: u8 = 0b00000100;

    /// Converts the function set to the flag bits of the command.
    pub fn to_mask(&self) -> u8 {
        let mut mask = 0;
        if self.lines == Lines::Two {
            mask |= Self::LINE_2;
        }
        if self.font == Font::Dots5x10 {
            mask |= Self::DOTS_5X10;
        }
        mask
    }
}

/// Direction of a cursor or display shift.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    Left,
    Right,
}
