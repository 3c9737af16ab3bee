//! One-shot invocation from a proxy event.
//!
//! Mirrors how a serverless host calls the function: one JSON event in, one
//! JSON response out, and a fault surfaces as an error instead of a response.

use kindle_core::StartupRequest;
use kindle_launcher::{InstanceProvider, StartupHandler};

use crate::error::GatewayError;

/// Handle one proxy event and return the serialized response.
///
/// # Errors
/// Returns [`GatewayError::InvalidEvent`] if the event has no `path`, and
/// [`GatewayError::Fault`] if the handler faulted.
pub async fn invoke<P: InstanceProvider>(
    handler: &StartupHandler<P>,
    event: &[u8],
) -> Result<String, GatewayError> {
    let request = StartupRequest::from_event_json(event)?;
    let result = handler.handle(&request).await?;
    Ok(serde_json::to_string(&result.into_response())?)
}
