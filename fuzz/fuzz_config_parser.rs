//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary text to `AppConfig::parse()`. Anything that parses and
//! validates must also turn into an engine builder without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = quiver_config::AppConfig::parse(s) {
            let _ = quiver_core::EngineBuilder::from_config(&config);
        }
    }
});
