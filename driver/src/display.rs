//! Display session.
//!
//! [Lcd] owns the driver and the flag registers of the controller. The controller is write-only,
//! so the registers kept here are the only record of its state: every setter updates one flag and
//! resends the whole register. A register only takes its new value once that write succeeded.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, warn};

use crate::config::LcdConfig;
use crate::driver::{HD44780Driver, I2cHD44780Driver};
use crate::expander::Pcf8574;
use crate::flags::{CursorDirection, DisplayControl, EntryMode, FunctionSet, TextDirection};
use crate::{LcdError, LcdResult};

/// Bitmap of a custom character: eight rows, the low five bits of each row are the pixels, most
/// significant bit on the left.
///
/// ```
/// const BELL: hd44780_i2c::Glyph = [0x04, 0x0E, 0x0E, 0x1F, 0x00, 0x04, 0x00, 0x00];
/// ```
pub type Glyph = [u8; 8];

/// An initialized HD44780 display behind a PCF8574 backpack.
#[derive(Debug)]
pub struct Lcd<I2C, D> {
    driver: I2cHD44780Driver<I2C, D>,
    columns: u8,
    rows: u8,
    entry_mode: EntryMode,
    display_control: DisplayControl,
    function_set: FunctionSet,
}

impl<I2C: I2c, D: DelayNs> Lcd<I2C, D> {
    /// Number of CGRAM slots for custom characters.
    pub const CUSTOM_CHAR_SLOTS: u8 = 8;

    /// Creates a session and initializes the controller.
    ///
    /// After this returns the display is on and cleared, the cursor is hidden and at home, the text
    /// flows left to right, and the backlight is off.
    ///
    /// # Errors
    /// - [LcdError::InvalidArgument] if the configuration is out of range, see [LcdConfig::is_valid].
    ///   Nothing is written in that case.
    /// - [LcdError::Transport] if any write of the initialization sequence fails.
    pub fn new(i2c: I2C, delay: D, config: LcdConfig) -> LcdResult<Self, I2C::Error> {
        if !config.is_valid() {
            return Err(LcdError::InvalidArgument);
        }

        let expander = Pcf8574::new(i2c, config.address, config.pins);
        let mut lcd = Lcd {
            driver: I2cHD44780Driver::new(expander, delay),
            columns: config.columns,
            rows: config.rows,
            entry_mode: EntryMode::default(),
            display_control: DisplayControl::default(),
            function_set: config.function_set(),
        };

        lcd.driver
            .init(lcd.entry_mode, lcd.function_set, lcd.display_control)?;

        Ok(lcd)
    }

    /// Creates a session for a module of the given size with the default backpack wiring.
    pub fn with_geometry(
        i2c: I2C,
        delay: D,
        address: u8,
        columns: u8,
        rows: u8,
    ) -> LcdResult<Self, I2C::Error> {
        Self::new(i2c, delay, LcdConfig::new(address, columns, rows))
    }

    /// Ends the session and gives back the bus and the delay. Nothing is sent to the display.
    pub fn release(self) -> (I2C, D) {
        self.driver.release()
    }

    pub fn address(&self) -> u8 {
        self.driver.expander().address()
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn entry_mode(&self) -> EntryMode {
        self.entry_mode
    }

    pub fn display_control(&self) -> DisplayControl {
        self.display_control
    }

    pub fn function_set(&self) -> FunctionSet {
        self.function_set
    }

    pub fn is_backlight_on(&self) -> bool {
        self.driver.expander().is_backlight_on()
    }

    fn update_display_control(
        &mut self,
        update: impl FnOnce(&mut DisplayControl),
    ) -> LcdResult<(), I2C::Error> {
        let mut control = self.display_control;
        update(&mut control);
        self.driver.set_display_control(control)?;
        self.display_control = control;
        Ok(())
    }

    fn update_entry_mode(
        &mut self,
        update: impl FnOnce(&mut EntryMode),
    ) -> LcdResult<(), I2C::Error> {
        let mut mode = self.entry_mode;
        update(&mut mode);
        self.driver.set_entry_mode(mode)?;
        self.entry_mode = mode;
        Ok(())
    }

    /// Turns the display on. DDRAM contents are kept while the display is off.
    pub fn display_on(&mut self) -> LcdResult<(), I2C::Error> {
        self.update_display_control(|control| control.display_on = true)
    }

    pub fn display_off(&mut self) -> LcdResult<(), I2C::Error> {
        self.update_display_control(|control| control.display_on = false)
    }

    /// Shows the underline cursor.
    pub fn cursor_on(&mut self) -> LcdResult<(), I2C::Error> {
        self.update_display_control(|control| control.cursor_on = true)
    }

    pub fn cursor_off(&mut self) -> LcdResult<(), I2C::Error> {
        self.update_display_control(|control| control.cursor_on = false)
    }

    /// Blinks the character cell under the cursor.
    pub fn cursor_blink_on(&mut self) -> LcdResult<(), I2C::Error> {
        self.update_display_control(|control| control.blink_on = true)
    }

    pub fn cursor_blink_off(&mut self) -> LcdResult<(), I2C::Error> {
        self.update_display_control(|control| control.blink_on = false)
    }

    /// Turns the backlight on or off.
    ///
    /// The backlight pin is part of every byte written to the expander, so the new state is
    /// written right away as a single byte with all other pins low, and kept for every later write.
    /// If that byte is not acknowledged the previous state is kept.
    pub fn set_backlight(&mut self, on: bool) -> LcdResult<(), I2C::Error> {
        let expander = self.driver.expander_mut();
        let previous = expander.is_backlight_on();
        expander.set_backlight(on);
        let result = expander.write_raw(0);
        if result.is_err() {
            expander.set_backlight(previous);
        }
        result
    }

    pub fn backlight_on(&mut self) -> LcdResult<(), I2C::Error> {
        self.set_backlight(true)
    }

    pub fn backlight_off(&mut self) -> LcdResult<(), I2C::Error> {
        self.set_backlight(false)
    }

    pub fn set_text_left_to_right(&mut self) -> LcdResult<(), I2C::Error> {
        self.update_entry_mode(|mode| mode.direction = TextDirection::LeftToRight)
    }

    pub fn set_text_right_to_left(&mut self) -> LcdResult<(), I2C::Error> {
        self.update_entry_mode(|mode| mode.direction = TextDirection::RightToLeft)
    }

    /// Shifts the whole display on every character written, so the text appears to be pushed
    /// away from the cursor.
    pub fn autoscroll_on(&mut self) -> LcdResult<(), I2C::Error> {
        self.update_entry_mode(|mode| mode.autoscroll = true)
    }

    pub fn autoscroll_off(&mut self) -> LcdResult<(), I2C::Error> {
        self.update_entry_mode(|mode| mode.autoscroll = false)
    }

    /// Shifts the visible window one position, without changing DDRAM.
    pub fn scroll_display_left(&mut self) -> LcdResult<(), I2C::Error> {
        self.driver.cursor_shift(true, CursorDirection::Left)
    }

    pub fn scroll_display_right(&mut self) -> LcdResult<(), I2C::Error> {
        self.driver.cursor_shift(true, CursorDirection::Right)
    }

    pub fn move_cursor_left(&mut self) -> LcdResult<(), I2C::Error> {
        self.driver.cursor_shift(false, CursorDirection::Left)
    }

    pub fn move_cursor_right(&mut self) -> LcdResult<(), I2C::Error> {
        self.driver.cursor_shift(false, CursorDirection::Right)
    }

    /// Clears the display and moves the cursor home.
    pub fn clear(&mut self) -> LcdResult<(), I2C::Error> {
        self.driver.clear_display()
    }

    /// Moves the cursor to the top left corner and undoes scrolling.
    pub fn home(&mut self) -> LcdResult<(), I2C::Error> {
        self.driver.return_home()
    }

    /// Moves the cursor to the given cell.
    ///
    /// Positions past the last row or column are clamped to it. Rows 2 and 3 of 4-row modules
    /// continue rows 0 and 1 in DDRAM, which is what the row offsets encode.
    pub fn set_cursor(&mut self, row: u8, column: u8) -> LcdResult<(), I2C::Error> {
        let row_offsets: [u8; 4] = [0x00, 0x40, self.columns, 0x40 + self.columns];

        let last_row = self.rows.min(LcdConfig::MAX_ROWS) - 1;
        let last_column = self.columns - 1;
        if row > last_row || column > last_column {
            debug!(
                "Cursor ({}, {}) clamped to ({}, {})",
                row,
                column,
                row.min(last_row),
                column.min(last_column)
            );
        }
        let row = row.min(last_row);
        let column = column.min(last_column);

        self.driver
            .set_ddram_address(row_offsets[row as usize] + column)
    }

    /// Writes a character code at the cursor.
    ///
    /// Codes 0–7 show the custom characters, 0x20–0x7D match ASCII. The rest depends on the
    /// character ROM of the controller.
    pub fn print_byte(&mut self, code: u8) -> LcdResult<(), I2C::Error> {
        self.driver.send_data(code)
    }

    /// Writes a character at the cursor. Characters outside ASCII are replaced with `?`.
    pub fn print_char(&mut self, c: char) -> LcdResult<(), I2C::Error> {
        let code = if c.is_ascii() {
            c as u8
        } else {
            warn!("Non-ASCII character: {}", c);
            b'?'
        };
        self.print_byte(code)
    }

    pub fn print_str(&mut self, s: &str) -> LcdResult<(), I2C::Error> {
        for c in s.chars() {
            self.print_char(c)?;
        }
        Ok(())
    }

    /// Writes raw character codes at the cursor.
    pub fn print_bytes(&mut self, codes: &[u8]) -> LcdResult<(), I2C::Error> {
        for &code in codes {
            self.print_byte(code)?;
        }
        Ok(())
    }

    /// Shows the custom character stored in `slot` at the cursor.
    pub fn print_custom_char(&mut self, slot: u8) -> LcdResult<(), I2C::Error> {
        self.driver.send_register_select(slot)
    }

    /// Stores a custom character in one of the eight CGRAM slots. Slots past 7 are clamped to 7.
    ///
    /// This leaves the address counter in CGRAM, so call [Lcd::set_cursor], [Lcd::home] or
    /// [Lcd::clear] before printing again.
    pub fn create_custom_char(&mut self, slot: u8, glyph: &Glyph) -> LcdResult<(), I2C::Error> {
        let last_slot = Self::CUSTOM_CHAR_SLOTS - 1;
        if slot > last_slot {
            debug!("Custom character slot {} clamped to {}", slot, last_slot);
        }
        let slot = slot.min(last_slot);

        self.driver.set_cgram_address(slot << 3)?;
        for &row in glyph {
            self.driver.send_register_select(row)?;
        }
        Ok(())
    }
}

/// Allows `write!` on the display. The transport error is lost, [fmt::Error] carries no payload.
impl<I2C: I2c, D: DelayNs> fmt::Write for Lcd<I2C, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print_str(s).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::flags::Lines;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::vec;
    use std::vec::Vec;

    fn nibble(value: u8) -> [I2cTransaction; 3] {
        [
            I2cTransaction::write(0x27, vec![value]),
            I2cTransaction::write(0x27, vec![value | 0x04]),
            I2cTransaction::write(0x27, vec![value & !0x04]),
        ]
    }

    fn init_sequence() -> Vec<I2cTransaction> {
        [0x30, 0x30, 0x30, 0x20, 0x00, 0x60, 0x20, 0x80, 0x00, 0xC0, 0x00, 0x10, 0x00, 0x20]
            .into_iter()
            .flat_map(nibble)
            .collect()
    }

    #[test]
    fn invalid_config_writes_nothing() {
        let mut i2c = I2cMock::new(&[]);
        let config = LcdConfig::new(0x27, 16, 0);

        let result = Lcd::new(i2c.clone(), NoopDelay::new(), config);

        assert!(matches!(result, Err(LcdError::InvalidArgument)));
        i2c.done();
    }

    #[test]
    fn defaults_after_init() {
        let expectations = init_sequence();
        let lcd = Lcd::with_geometry(I2cMock::new(&expectations), NoopDelay::new(), 0x27, 16, 2)
            .unwrap();

        assert_eq!(lcd.entry_mode(), EntryMode::default());
        assert_eq!(lcd.display_control(), DisplayControl::default());
        assert_eq!(lcd.function_set().lines, Lines::Two);
        assert!(!lcd.is_backlight_on());
        assert_eq!((lcd.address(), lcd.columns(), lcd.rows()), (0x27, 16, 2));

        lcd.release().0.done();
    }

    #[test]
    fn backlight_write_carries_only_the_mask() {
        let mut expectations = init_sequence();
        expectations.push(I2cTransaction::write(0x27, vec![0x08]));
        // display control 0x0C with the backlight bit
        expectations.extend(nibble(0x08));
        expectations.extend(nibble(0xC8));
        expectations.push(I2cTransaction::write(0x27, vec![0x00]));

        let mut lcd = Lcd::with_geometry(I2cMock::new(&expectations), NoopDelay::new(), 0x27, 16, 2)
            .unwrap();
        lcd.backlight_on().unwrap();
        assert!(lcd.is_backlight_on());
        lcd.display_on().unwrap();
        lcd.backlight_off().unwrap();
        assert!(!lcd.is_backlight_on());

        lcd.release().0.done();
    }

    #[test]
    fn custom_char_is_programmed_row_by_row() {
        const BELL: Glyph = [0x04, 0x0E, 0x0E, 0x1F, 0x00, 0x04, 0x00, 0x00];

        let mut expectations = init_sequence();
        // CGRAM address of slot 2: 0x40 | 0x10
        expectations.extend(nibble(0x50));
        expectations.extend(nibble(0x00));
        for row in BELL {
            expectations.extend(nibble((row & 0xF0) | 0x01));
            expectations.extend(nibble((row << 4) | 0x01));
        }

        let mut lcd = Lcd::with_geometry(I2cMock::new(&expectations), NoopDelay::new(), 0x27, 16, 2)
            .unwrap();
        lcd.create_custom_char(2, &BELL).unwrap();

        lcd.release().0.done();
    }
}
