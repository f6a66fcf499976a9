mod common;

use common::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn cursor_never_leaves_the_display(
        (columns, rows) in prop_oneof![Just((16u8, 2u8)), Just((20, 4)), Just((8, 1)), Just((40, 2))],
        row in any::<u8>(),
        column in any::<u8>(),
    ) {
        let mut lcd = session(columns, rows);
        lcd.set_cursor(row, column).unwrap();

        let commands = decode(&sent_after_init(lcd));
        prop_assert_eq!(commands.len(), 1);
        let (rs, command) = commands[0];
        prop_assert!(!rs);

        let row = row.min(rows - 1);
        let column = column.min(columns - 1);
        let row_offsets = [0x00, 0x40, columns, 0x40 + columns];
        prop_assert_eq!(command, 0x80 | (row_offsets[row as usize] + column));
    }

    #[test]
    fn every_byte_is_two_pulses_high_nibble_first(value in any::<u8>()) {
        let mut lcd = session(16, 2);
        lcd.print_byte(value).unwrap();

        let sent = sent_after_init(lcd);
        prop_assert_eq!(sent.len(), 6);
        prop_assert_eq!(
            latched(&sent),
            vec![(value & 0xF0) | REGISTER_SELECT, (value << 4) | REGISTER_SELECT]
        );
        // each nibble is set up, raised and dropped
        for nibble in sent.chunks(3) {
            prop_assert_eq!(nibble[0] & ENABLE, 0);
            prop_assert_eq!(nibble[1], nibble[0] | ENABLE);
            prop_assert_eq!(nibble[2], nibble[0]);
        }
    }

    #[test]
    fn custom_char_slot_stays_in_cgram(slot in any::<u8>()) {
        let mut lcd = session(16, 2);
        lcd.create_custom_char(slot, &[0; 8]).unwrap();

        let commands = decode(&sent_after_init(lcd));
        prop_assert_eq!(commands[0], (false, 0x40 | (slot.min(7) << 3)));
    }

    #[test]
    fn print_str_decomposes_into_chars(text in "[ -~]{0,8}") {
        let mut by_string = session(16, 2);
        by_string.print_str(&text).unwrap();

        let mut by_char = session(16, 2);
        for c in text.chars() {
            by_char.print_char(c).unwrap();
        }

        prop_assert_eq!(sent_after_init(by_string), sent_after_init(by_char));
    }
}
