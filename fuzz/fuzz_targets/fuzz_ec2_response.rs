//! Fuzz target: interpreting `StartInstances` responses.
//!
//! The first two bytes pick the HTTP status, the rest is the body.

#![no_main]

use kindle_launcher::ec2::parse_start_response;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let status = 100 + u16::from_be_bytes([data[0], data[1]]) % 500;
    let body = String::from_utf8_lossy(&data[2..]);
    let _ = parse_start_response(status, &body);
});
