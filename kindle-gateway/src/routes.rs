//! Axum routing for the startup gateway.
//!
//! Every method on every path goes to the startup handler: the path is the
//! password carrier, so no route may shadow it.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_TYPE, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use kindle_core::{StartupRequest, StartupResult};
use kindle_launcher::{InstanceProvider, StartupHandler};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::GatewayError;

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router around a shared startup handler.
pub fn create_router<P>(handler: Arc<StartupHandler<P>>) -> Router
where
    P: InstanceProvider + 'static,
{
    Router::new()
        .fallback(start_server::<P>)
        .with_state(handler)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
}

/// Span for one HTTP request. The URI is left out: its path may be the password.
fn request_span(request: &Request<Body>) -> tracing::Span {
    tracing::debug_span!("request", method = %request.method())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `ANY /*` — authorize by path and start the instance.
///
/// # Errors
/// Returns [`GatewayError::Fault`] if the provider failed with anything other
/// than access denied.
pub async fn start_server<P>(
    State(handler): State<Arc<StartupHandler<P>>>,
    uri: Uri,
) -> Result<Response, GatewayError>
where
    P: InstanceProvider + 'static,
{
    let span = tracing::info_span!("invocation", invocation_id = %Uuid::new_v4());
    let request = StartupRequest::new(uri.path());
    let result = handler.handle(&request).instrument(span).await?;
    Ok(startup_response(result))
}

/// Render a startup outcome as an HTTP response with a JSON string body.
#[must_use]
pub fn startup_response(result: StartupResult) -> Response {
    let response = result.into_response();
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(CONTENT_TYPE, "application/json")], response.body).into_response()
}
