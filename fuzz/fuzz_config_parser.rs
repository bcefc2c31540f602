//! Fuzz target for the client configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary bytes through `ClientConfig::parse()` (TOML parsing plus
//! validation) and checks that every accepted config resolves to an
//! endpoint.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = subiquity_config::ClientConfig::parse(s) {
            let _ = config.endpoint.target();
        }
    }
});
