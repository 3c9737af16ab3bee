use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier of the compute instance the service is allowed to start.
///
/// The value is opaque to this crate; only its shape is checked so that a
/// misconfigured deployment fails at startup rather than on the first request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstanceId(String);

impl InstanceId {
    /// Validates and wraps an instance identifier.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidInstanceId`] if the value is empty or
    /// contains whitespace or control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let value = id.into();
        if value.is_empty() {
            return Err(CoreError::InvalidInstanceId { value, reason: "must not be empty" });
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CoreError::InvalidInstanceId {
                value,
                reason: "must not contain whitespace or control characters",
            });
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InstanceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for InstanceId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InstanceId> for String {
    fn from(id: InstanceId) -> Self {
        id.0
    }
}
