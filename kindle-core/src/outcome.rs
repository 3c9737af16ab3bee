//! Startup outcomes and their HTTP-shaped encoding.

use serde::Serialize;

/// Body message for [`StartupResult::Unauthorized`].
pub const UNAUTHORIZED_MESSAGE: &str = "Password required to access this resource";

/// Body message for [`StartupResult::Started`].
pub const STARTED_MESSAGE: &str = "Server is starting";

/// Reason carried by [`StartupResult::Forbidden`] when the provider denies the
/// start. Points the user at the cost budget, which revokes start permission
/// once it is exhausted.
pub const BUDGET_DENIED_MESSAGE: &str =
    "Permission denied starting resource, did your budget run out?";

/// The user-facing outcome of one startup invocation.
///
/// Unexpected provider failures are deliberately not represented here: they
/// travel on the error path so they cannot be rendered as a normal response.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StartupResult {
    /// The request path did not carry the configured password.
    Unauthorized,
    /// The provider accepted the start request.
    Started,
    /// The provider refused the start for authorization reasons.
    Forbidden { reason: String },
}

impl StartupResult {
    /// Builds the forbidden outcome with the budget hint message.
    #[must_use]
    pub fn budget_denied() -> Self {
        Self::Forbidden { reason: BUDGET_DENIED_MESSAGE.to_owned() }
    }

    /// HTTP status code for this outcome.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::Started => 200,
            Self::Forbidden { .. } => 403,
        }
    }

    /// Human-readable message, before JSON encoding.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized => UNAUTHORIZED_MESSAGE,
            Self::Started => STARTED_MESSAGE,
            Self::Forbidden { reason } => reason,
        }
    }

    /// Encodes the outcome as an HTTP-shaped response.
    #[must_use]
    pub fn into_response(self) -> StartupResponse {
        StartupResponse::new(self.status_code(), self.message())
    }
}

/// HTTP-shaped response: a status code and a JSON-encoded message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct StartupResponse {
    pub status_code: u16,
    /// The message as a JSON string literal, quotes included.
    pub body: String,
}

impl StartupResponse {
    /// Creates a response whose body is `message` encoded as a JSON string.
    #[must_use]
    pub fn new(status_code: u16, message: &str) -> Self {
        Self { status_code, body: encode_message(message) }
    }
}

fn encode_message(message: &str) -> String {
    // Serializing a str cannot fail.
    serde_json::to_string(message).unwrap_or_else(|_| format!("\"{}\"", message.escape_default()))
}
