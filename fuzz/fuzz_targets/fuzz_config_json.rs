//! Fuzz target: `SystemConfig::from_json`
//!
//! Arbitrary bytes must never panic the decoder, and anything it accepts
//! must already satisfy `validate()`.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use comfortctl::config::SystemConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = SystemConfig::from_json(text) {
        assert!(config.validate().is_ok());
    }
});
