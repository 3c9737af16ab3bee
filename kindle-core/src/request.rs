use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One incoming startup request.
///
/// Deserializes from an API-gateway proxy event: only `path` is read and any
/// other field of the envelope is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct StartupRequest {
    /// Full request path, including the leading slash.
    pub path: String,
}

impl StartupRequest {
    /// Creates a request for the given path.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Decodes a proxy event.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidEvent`] if the input is not JSON or has no
    /// string `path` field.
    pub fn from_event_json(event: &[u8]) -> Result<Self, CoreError> {
        Ok(serde_json::from_slice(event)?)
    }
}
