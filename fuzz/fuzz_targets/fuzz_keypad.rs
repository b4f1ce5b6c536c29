//! Fuzz target: keypad code accumulator
//!
//! Feeds arbitrary characters into `CodeEntry` and checks that the buffer
//! never holds more digits than the code and that completion always
//! empties it.
//!
//! cargo fuzz run fuzz_keypad

#![no_main]

use comfortctl::auth::{CodeEntry, EntryProgress, Key};
use libfuzzer_sys::fuzz_target;

const CODE: &str = "1234";

fuzz_target!(|data: &[u8]| {
    let mut entry = CodeEntry::new();
    for &b in data {
        let Some(key) = Key::from_char(char::from(b)) else {
            continue;
        };
        let progress = entry.push(key, CODE);
        assert!(entry.len() < CODE.len());
        if let EntryProgress::Complete(_) = progress {
            assert!(entry.is_empty());
        }
    }
});
