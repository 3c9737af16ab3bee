//! Path-based startup password.
//!
//! The request is authorized when its path is exactly `/` followed by the
//! password. The comparison is plain string equality: no trimming, no case
//! folding, no percent-decoding, and not constant-time.

use std::fmt;

/// A configured, non-empty startup password.
#[derive(Clone, PartialEq, Eq)]
pub struct StartupPassword(String);

impl StartupPassword {
    /// Wraps a password, treating an empty string as "no password configured".
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        if password.is_empty() {
            None
        } else {
            Some(Self(password))
        }
    }

    /// Returns `true` if `path` is exactly `"/" + password`.
    #[must_use]
    pub fn matches_path(&self, path: &str) -> bool {
        path.strip_prefix('/') == Some(self.0.as_str())
    }
}

impl fmt::Debug for StartupPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StartupPassword(<redacted>)")
    }
}

/// Decides whether a request path is authorized under an optional password.
///
/// With no password every path is authorized.
#[must_use]
pub fn is_authorized(password: Option<&StartupPassword>, path: &str) -> bool {
    password.is_none_or(|p| p.matches_path(path))
}
