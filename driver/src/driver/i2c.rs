use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, trace};

use crate::driver::{HD44780Driver, Mode};
use crate::expander::Pcf8574;
use crate::flags::{DisplayControl, EntryMode, FunctionSet};
use crate::LcdResult;

/// Settle time around every enable edge, in microseconds.
pub const PULSE_DELAY_US: u32 = 600;

/// HD44780 driver writing through a PCF8574 expander in 4-bit mode.
///
/// Every nibble costs three expander writes: the data with E low, the data with E high, and the
/// data with E low again. The controller latches the nibble on the falling edge. The E pin is held
/// for [PULSE_DELAY_US] before the rising edge, between the edges and after the falling edge, which
/// covers the execution time of every instruction except clear and home on slow controllers, and
/// makes the timing independent of the bus clock.
///
/// No busy flag is polled. The R/W line is always held low.
#[derive(Debug)]
pub struct I2cHD44780Driver<I2C, D> {
    expander: Pcf8574<I2C>,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> I2cHD44780Driver<I2C, D> {
    pub fn new(expander: Pcf8574<I2C>, delay: D) -> Self {
        I2cHD44780Driver { expander, delay }
    }

    pub fn expander(&self) -> &Pcf8574<I2C> {
        &self.expander
    }

    pub fn expander_mut(&mut self) -> &mut Pcf8574<I2C> {
        &mut self.expander
    }

    /// Gives back the bus and the delay.
    pub fn release(self) -> (I2C, D) {
        (self.expander.release(), self.delay)
    }

    /// Gets the control bits for the given register on the current pin map.
    pub fn mode_mask(&self, mode: Mode) -> u8 {
        match mode {
            Mode::Command => 0,
            Mode::Char | Mode::RegisterSelect => self.expander.pins().register_select_mask(),
        }
    }

    /// Latches `value` into the controller with one enable pulse.
    fn pulse_enable(&mut self, value: u8) -> LcdResult<(), I2C::Error> {
        let enable = self.expander.pins().enable_mask();

        self.delay.delay_us(PULSE_DELAY_US);
        self.expander.write_raw(value | enable)?;
        self.delay.delay_us(PULSE_DELAY_US);
        self.expander.write_raw(value & !enable)?;
        self.delay.delay_us(PULSE_DELAY_US);
        Ok(())
    }

    /// Puts the nibble and control bits on the pins, then latches them.
    ///
    /// `value` carries the nibble in its upper half and the control bits in its lower half.
    pub fn send_nibble(&mut self, value: u8) -> LcdResult<(), I2C::Error> {
        // write only, RW stays low
        let value = value & !self.expander.pins().read_write_mask();
        trace!("Writing nibble: {:04b}, control: {:04b}", value >> 4, value & 0x0F);
        self.expander.write_raw(value)?;
        self.pulse_enable(value)
    }

    /// Sends a full byte as two nibbles, high nibble first.
    pub fn send_byte(&mut self, value: u8, mode: Mode) -> LcdResult<(), I2C::Error> {
        trace!("Sending data: {:08b}, mode: {:?}", value, mode);

        let mode = self.mode_mask(mode);
        let high = value & 0xF0;
        let low = (value << 4) & 0xF0;

        self.send_nibble(high | mode)?;
        self.send_nibble(low | mode)
    }
}

impl<I2C: I2c, D: DelayNs> HD44780Driver for I2cHD44780Driver<I2C, D> {
    type Error = I2C::Error;

    /// Initializes the controller from an unknown state.
    ///
    /// At power-up, or after a previous session was cut off mid-byte, the controller may be in
    /// 8-bit mode or waiting for the second nibble of a byte. Sending the `0011` nibble three times
    /// forces it into 8-bit mode, whatever the state was. The `0010` nibble then switches it to
    /// 4-bit mode, after which every byte is sent as two nibbles.
    ///
    /// Then the registers are sent in this order: entry mode, function set, display control,
    /// followed by clear and return home.
    fn init(
        &mut self,
        entry_mode: EntryMode,
        function_set: FunctionSet,
        display_control: DisplayControl,
    ) -> LcdResult<(), I2C::Error> {
        debug!("Initializing HD44780 at {:#04x}", self.expander.address());

        // Synchronize
        let command = self.mode_mask(Mode::Command);
        self.send_nibble((0x03 << 4) | command)?;
        self.send_nibble((0x03 << 4) | command)?;
        self.send_nibble((0x03 << 4) | command)?;
        // 4-bit mode
        self.send_nibble((0x02 << 4) | command)?;

        self.set_entry_mode(entry_mode)?;
        self.function_set(function_set)?;
        self.set_display_control(display_control)?;
        self.clear_display()?;
        self.return_home()?;

        debug!("HD44780 initialized");
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> LcdResult<(), I2C::Error> {
        self.send_byte(command, Mode::Command)
    }

    fn send_data(&mut self, data: u8) -> LcdResult<(), I2C::Error> {
        self.send_byte(data, Mode::Char)
    }

    fn send_register_select(&mut self, data: u8) -> LcdResult<(), I2C::Error> {
        self.send_byte(data, Mode::RegisterSelect)
    }
}
