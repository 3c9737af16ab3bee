//! Fuzz target: path password check.
//!
//! Splits the input into a password and a path and checks that the
//! authorization decision is exactly `path == "/" + password`.

#![no_main]

use kindle_core::{is_authorized, StartupPassword};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let Some((secret, path)) = text.split_once('\n') else {
        return;
    };
    let Some(password) = StartupPassword::new(secret) else {
        return;
    };
    assert_eq!(is_authorized(Some(&password), path), path == format!("/{secret}"));
});
