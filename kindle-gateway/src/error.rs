//! Error types for the gateway crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors that can occur while serving a startup invocation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The handler ended in a fault. Rendered as a bare 500, never as one of
    /// the user-facing startup messages.
    #[error("startup fault: {0}")]
    Fault(#[from] kindle_launcher::StartupFault),

    /// An invocation event could not be decoded.
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] kindle_core::CoreError),

    /// A response could not be encoded.
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidEvent(_) => StatusCode::BAD_REQUEST,
            GatewayError::Fault(_) | GatewayError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Fault details stay in the logs.
        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}
