#![allow(dead_code)]

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use hd44780_i2c::{Lcd, LcdConfig};

pub const ADDRESS: u8 = 0x27;
pub const ENABLE: u8 = 0x04;
pub const REGISTER_SELECT: u8 = 0x01;
pub const BACKLIGHT: u8 = 0x08;

/// Four synchronization nibbles and five commands, three writes per nibble.
pub const INIT_WRITES: usize = (4 + 5 * 2) * 3;

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

/// I2C bus that records every byte written, and can be told to stop acknowledging.
#[derive(Debug, Default)]
pub struct RecordingBus {
    pub writes: Vec<(u8, u8)>,
    pub fail_after: Option<usize>,
}

impl RecordingBus {
    pub fn failing_after(writes: usize) -> Self {
        RecordingBus {
            writes: Vec::new(),
            fail_after: Some(writes),
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.writes.iter().map(|&(_, byte)| byte).collect()
    }
}

impl ErrorType for RecordingBus {
    type Error = ErrorKind;
}

impl I2c for RecordingBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    if self.fail_after.is_some_and(|limit| self.writes.len() >= limit) {
                        return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
                    }
                    self.writes.extend(bytes.iter().map(|&byte| (address, byte)));
                }
                Operation::Read(_) => return Err(ErrorKind::Other),
            }
        }
        Ok(())
    }
}

/// Delay that only records what it was asked to wait.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub delays_ns: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ns.push(ns);
    }
}

pub fn session(columns: u8, rows: u8) -> Lcd<RecordingBus, RecordingDelay> {
    init_logger();
    Lcd::new(
        RecordingBus::default(),
        RecordingDelay::default(),
        LcdConfig::new(ADDRESS, columns, rows),
    )
    .expect("recording bus never fails")
}

/// Bytes written after the initialization sequence.
pub fn sent_after_init(lcd: Lcd<RecordingBus, RecordingDelay>) -> Vec<u8> {
    let (bus, _) = lcd.release();
    bus.bytes().split_off(INIT_WRITES)
}

/// The values latched by the controller, i.e. the pin states on every rising enable edge, with
/// the enable bit removed.
pub fn latched(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .filter(|&&byte| byte & ENABLE != 0)
        .map(|&byte| byte & !ENABLE)
        .collect()
}

/// Reassembles latched nibble pairs into `(register select, byte)` tuples.
pub fn decode(bytes: &[u8]) -> Vec<(bool, u8)> {
    latched(bytes)
        .chunks(2)
        .map(|pair| {
            let rs = pair[0] & REGISTER_SELECT != 0;
            (rs, (pair[0] & 0xF0) | (pair[1] >> 4))
        })
        .collect()
}
