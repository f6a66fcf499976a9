//! Driver for HD44780 character LCDs behind a PCF8574 I²C GPIO expander, the common "I2C backpack"
//! found on 16x2 and 20x4 modules.
//!
//! The controller is driven in 4-bit mode. Every controller byte is split into two nibbles that are
//! latched one at a time by pulsing the enable line, and every level change on the LCD pins is a
//! single-byte write to the expander. The layers, from the bottom up:
//!
//! - [Pcf8574] owns the bus and merges the backlight bit into every byte it writes,
//! - [I2cHD44780Driver] sequences enable pulses and splits bytes into nibbles,
//! - [HD44780Driver] encodes the controller instruction set,
//! - [Lcd] keeps the flag registers and exposes the operations an application uses.
//!
//! The bus and the delay are [embedded_hal] 1.0 traits, so any HAL works. Bus setup (pins, clock,
//! pull-ups) is the caller's job and happens before a session is created.
//!
//! ```ignore
//! let mut lcd = Lcd::new(i2c, delay, LcdConfig::default())?;
//! lcd.backlight_on()?;
//! lcd.set_cursor(1, 0)?;
//! lcd.print_str("Hello")?;
//! ```
#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod driver;
pub mod expander;
pub mod flags;

pub use config::{LcdConfig, PinMap};
pub use display::{Glyph, Lcd};
pub use driver::{HD44780Driver, I2cHD44780Driver, Mode};
pub use expander::Pcf8574;
pub use flags::{CursorDirection, DisplayControl, EntryMode, Font, FunctionSet, Lines, TextDirection};

use thiserror::Error;

/// Errors returned by the driver.
///
/// `E` is the error type of the underlying I²C bus.
#[derive(Debug, Error, Eq, PartialEq, Clone, Copy)]
pub enum LcdError<E> {
    /// A write to the expander failed. The controller may be left in the middle of a command.
    #[error("I2C transport failure: {0:?}")]
    Transport(E),
    #[error("invalid argument")]
    InvalidArgument,
}

pub type LcdResult<T, E> = Result<T, LcdError<E>>;
