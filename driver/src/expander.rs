use embedded_hal::i2c::I2c;
use log::trace;

use crate::config::PinMap;
use crate::{LcdError, LcdResult};

/// PCF8574 quasi-bidirectional I/O expander acting as the LCD's parallel port.
///
/// The expander has no registers: every byte written to it is latched straight onto its eight pins.
/// The backlight pin is therefore part of every byte, and the expander keeps the backlight state to
/// merge it into each write.
#[derive(Debug)]
pub struct Pcf8574<I2C> {
    i2c: I2C,
    address: u8,
    pins: PinMap,
    backlight: bool,
}

impl<I2C: I2c> Pcf8574<I2C> {
    /// Wraps an already configured bus. The backlight starts off and nothing is written.
    pub fn new(i2c: I2C, address: u8, pins: PinMap) -> Self {
        Pcf8574 {
            i2c,
            address,
            pins,
            backlight: false,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn pins(&self) -> &PinMap {
        &self.pins
    }

    pub fn is_backlight_on(&self) -> bool {
        self.backlight
    }

    /// The bits to merge into every byte for the current backlight state.
    pub fn backlight_mask(&self) -> u8 {
        if self.backlight {
            self.pins.backlight_mask()
        } else {
            0
        }
    }

    /// Changes the backlight state used for subsequent writes. Nothing is written.
    pub fn set_backlight(&mut self, on: bool) {
        self.backlight = on;
    }

    /// Writes a single byte to the expander pins, with the backlight bit merged in.
    pub fn write_raw(&mut self, value: u8) -> LcdResult<(), I2C::Error> {
        let byte = value | self.backlight_mask();
        trace!("Expander write: {:08b}", byte);
        self.i2c
            .write(self.address, &[byte])
            .map_err(LcdError::Transport)
    }

    /// Gives back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}
