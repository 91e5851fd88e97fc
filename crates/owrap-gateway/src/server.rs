//! Axum HTTP server for the gateway.
//!
//! This module provides the router and the `serve()` function that runs it
//! on a pre-bound `TcpListener` until the cancellation token fires.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::{GatewayError, GatewayResult};
use crate::models::{ErrorBody, GenerateRequest, HealthResponse};
use crate::upstream::{InferenceBackend, UpstreamJson};

/// Shared application state for the gateway.
#[derive(Clone)]
pub struct GatewayState {
    /// Where `/models` and `/generate` are forwarded.
    upstream: Arc<dyn InferenceBackend>,
}

impl GatewayState {
    pub fn new(upstream: Arc<dyn InferenceBackend>) -> Self {
        Self { upstream }
    }
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health_check).fallback(method_not_allowed))
        .route("/models", get(list_models).fallback(method_not_allowed))
        .route("/generate", post(generate).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway with a pre-bound listener.
///
/// Runs until `cancel` is triggered, then drains in-flight requests.
pub async fn serve(
    listener: TcpListener,
    upstream: Arc<dyn InferenceBackend>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(upstream = %upstream.base_url(), "Gateway listening on http://{addr}");

    let app = router(GatewayState::new(upstream));

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

/// Health check endpoint. Never contacts the upstream.
async fn health_check(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.upstream.base_url()))
}

/// List upstream models (`/api/tags`), body passed through.
async fn list_models(State(state): State<GatewayState>) -> GatewayResult<UpstreamJson> {
    debug!("GET /models");
    state.upstream.list_models().await
}

/// Run a generation on the upstream (`/api/generate`), body passed through.
async fn generate(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> GatewayResult<UpstreamJson> {
    let request = parse_generate_body(&headers, &body)?;
    info!(model = %request.model, stream = ?request.stream, "POST /generate");
    state.upstream.generate(&request).await
}

/// Decode a `/generate` body.
///
/// A body without `Content-Type` is read as JSON; any other declared type
/// must be JSON (`application/json` or `application/*+json`).
fn parse_generate_body(headers: &HeaderMap, body: &[u8]) -> GatewayResult<GenerateRequest> {
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        if !is_json_content_type(content_type) {
            return Err(GatewayError::InvalidRequest(
                "Expected request with `Content-Type: application/json`".to_string(),
            ));
        }
    }

    serde_json::from_slice(body).map_err(|e| {
        GatewayError::InvalidRequest(format!(
            "Failed to deserialize the JSON body into the target type: {e}"
        ))
    })
}

fn is_json_content_type(value: &HeaderValue) -> bool {
    let Ok(value) = value.to_str() else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

async fn not_found() -> Response {
    debug!("No route matched");
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not Found"))).into_response()
}

async fn method_not_allowed() -> Response {
    debug!("Method not allowed");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new("Method Not Allowed")),
    )
        .into_response()
}

/// Turn a handler panic into a 500 carrying the panic message.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap_or_else(|| "Internal Server Error".to_string());

    GatewayError::Unexpected(message).into_response()
}
