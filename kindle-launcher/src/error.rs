//! Error types for the launcher crate.

/// Failure of a provider call.
///
/// Only [`ProviderError::AccessDenied`] is an anticipated, user-facing
/// condition. Every other variant is a fault.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// The provider refused the action for authorization reasons.
    #[error("access denied ({code}): {message}")]
    AccessDenied { code: String, message: String },

    /// The provider rejected the request for any other reason.
    #[error("provider error {code} (HTTP {status}): {message}")]
    Api { status: u16, code: String, message: String },

    /// The request never got a response: connection, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a body that could not be understood.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Signing credentials are missing or unusable.
    #[error("credentials error: {0}")]
    Credentials(String),

    /// Provider settings are malformed (endpoint, region, timeout).
    #[error("provider configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Returns `true` for the access-denied class of failures.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A startup invocation that ended in a fault rather than a response.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StartupFault {
    /// The provider failed with an error other than access denied.
    #[error("unexpected error starting instance: {0}")]
    Provider(#[source] ProviderError),
}
