//! HD44780 instruction set.
//!
//! See [HD44780Driver] for the commands and [I2cHD44780Driver] for the implementation driving the
//! controller through a PCF8574 expander.

mod i2c;

use crate::flags::{CursorDirection, DisplayControl, EntryMode, FunctionSet};
use crate::{LcdError, LcdResult};
pub use i2c::*;

/// Register the byte is written to, selected by the RS line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    /// Instruction register, RS low.
    Command,
    /// Data register, RS high. Writes a character code to DDRAM.
    Char,
    /// Data register, RS high. Used for custom glyph rows and slot indices.
    RegisterSelect,
}

/// The `HD44780Driver` trait defines the write-only instruction set of the HD44780 controller.
///
/// The command methods are implemented on top of [HD44780Driver::send_command], so an
/// implementation only has to provide the byte transport and the initialization sequence.
///
/// # Commands
///
/// Each command is a byte whose highest set bit selects the instruction. In the documentation,
/// the bits that are ignored by the controller are marked as `?` and are always sent as `0`.
pub trait HD44780Driver {
    /// Error type of the underlying transport.
    type Error;

    /// Runs the cold-start handshake and leaves the controller in 4-bit mode with the given
    /// registers applied, the display cleared and the cursor at home.
    fn init(
        &mut self,
        entry_mode: EntryMode,
        function_set: FunctionSet,
        display_control: DisplayControl,
    ) -> LcdResult<(), Self::Error>;

    /// Clears the display and sets the cursor to the home position.
    ///
    /// Command: `00000001`.
    fn clear_display(&mut self) -> LcdResult<(), Self::Error> {
        self.send_command(0b00000001)
    }

    /// Sets the cursor to the home position and undoes any display shift.
    ///
    /// Command: `0000001?`.
    fn return_home(&mut self) -> LcdResult<(), Self::Error> {
        self.send_command(0b00000010)
    }

    /// Command: `000001IS`, see [EntryMode].
    fn set_entry_mode(&mut self, entry_mode: EntryMode) -> LcdResult<(), Self::Error> {
        self.send_command(0b00000100 | entry_mode.to_mask())
    }

    /// Command: `00001DCB`, see [DisplayControl].
    fn set_display_control(&mut self, control: DisplayControl) -> LcdResult<(), Self::Error> {
        self.send_command(0b00001000 | control.to_mask())
    }

    /// Moves the cursor or shifts the whole display by one position without touching DDRAM.
    ///
    /// Command: `0001SR??`.
    /// `S` is `1` for display shift, `0` for cursor move.
    /// `R` is `1` for right, `0` for left.
    fn cursor_shift(
        &mut self,
        display_shift: bool,
        direction: CursorDirection,
    ) -> LcdResult<(), Self::Error> {
        let mut command = 0b00010000;
        if display_shift {
            command |= 0b00001000;
        }
        if direction == CursorDirection::Right {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Command: `001DNF??`, see [FunctionSet]. The data length bit is always `0` (4-bit bus).
    fn function_set(&mut self, function_set: FunctionSet) -> LcdResult<(), Self::Error> {
        self.send_command(0b00100000 | function_set.to_mask())
    }

    /// Points the address counter into CGRAM, where custom glyphs are stored. Following data
    /// writes fill glyph rows.
    ///
    /// The address is a 6-bit value. If out of bounds, it will return
    /// [LcdError::InvalidArgument].
    ///
    /// Command: `01AAAAAA`.
    fn set_cgram_address(&mut self, address: u8) -> LcdResult<(), Self::Error> {
        if address > 0b00111111 {
            return Err(LcdError::InvalidArgument);
        }
        self.send_command(0b01000000 | address)
    }

    /// Points the address counter into DDRAM, which moves the cursor.
    ///
    /// Lines start at `0x00` and `0x40`. The address is a 7-bit value, and if out of bounds,
    /// it will return [LcdError::InvalidArgument].
    ///
    /// Command: `1AAAAAAA`.
    fn set_ddram_address(&mut self, address: u8) -> LcdResult<(), Self::Error> {
        if address > 0b01111111 {
            return Err(LcdError::InvalidArgument);
        }
        self.send_command(0b10000000 | address)
    }

    // Low-level commands
    // These are used by the commands above and implemented by the transport.

    /// Sends a byte to the instruction register. RS is set to `0`.
    fn send_command(&mut self, command: u8) -> LcdResult<(), Self::Error>;

    /// Sends a character code to the data register. RS is set to `1`.
    fn send_data(&mut self, data: u8) -> LcdResult<(), Self::Error>;

    /// Sends a glyph row or glyph slot index to the data register. RS is set to `1`.
    fn send_register_select(&mut self, data: u8) -> LcdResult<(), Self::Error>;
}
