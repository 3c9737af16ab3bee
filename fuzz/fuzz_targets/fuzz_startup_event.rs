//! Fuzz target: decoding a proxy event into a `StartupRequest`.
//!
//! Arbitrary bytes must never panic the decoder; errors are expected.

#![no_main]

use kindle_core::StartupRequest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = StartupRequest::from_event_json(data);
});
