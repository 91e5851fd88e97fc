//! Forwarding to the upstream Ollama server.
//!
//! Handlers talk to [`InferenceBackend`]; [`OllamaClient`] is the reqwest
//! implementation used in production. Each call makes exactly one outbound
//! request and is never retried.

use async_trait::async_trait;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use reqwest::Client;
use serde::de::IgnoredAny;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::models::GenerateRequest;

/// A JSON body received from the upstream, kept as the exact bytes sent.
///
/// Construction checks that the bytes parse as JSON; they are never
/// re-serialized, so key order and formatting survive the round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamJson(Bytes);

impl UpstreamJson {
    pub fn from_bytes(body: Bytes) -> GatewayResult<Self> {
        serde_json::from_slice::<IgnoredAny>(&body).map_err(GatewayError::InvalidUpstreamJson)?;
        Ok(Self(body))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl IntoResponse for UpstreamJson {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            self.0,
        )
            .into_response()
    }
}

/// The upstream operations the gateway exposes.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Root URL of the upstream, reported by the health check.
    fn base_url(&self) -> &str;

    /// `GET /api/tags`.
    async fn list_models(&self) -> GatewayResult<UpstreamJson>;

    /// `POST /api/generate`.
    async fn generate(&self, request: &GenerateRequest) -> GatewayResult<UpstreamJson>;
}

/// reqwest-backed client for an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a client with reqwest defaults (no explicit timeout).
    pub fn new(config: &UpstreamConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::Unexpected(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config.base_url()))
    }

    /// Use an existing reqwest client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_models(&self) -> GatewayResult<UpstreamJson> {
        let url = self.url("/api/tags");
        debug!("Forwarding to {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(GatewayError::UpstreamUnreachable)?;

        read_json(response).await
    }

    async fn generate(&self, request: &GenerateRequest) -> GatewayResult<UpstreamJson> {
        let url = self.url("/api/generate");
        let body = request.upstream_body();
        debug!(model = %body.model, stream = %body.stream, "Forwarding to {url}");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(GatewayError::UpstreamUnreachable)?;

        read_json(response).await
    }
}

/// Check the status and collect a JSON body.
async fn read_json(response: reqwest::Response) -> GatewayResult<UpstreamJson> {
    let status = response.status();
    if !status.is_success() {
        let url = response.url().to_string();
        debug!(%status, %url, "Upstream returned an error status");
        return Err(GatewayError::UpstreamStatus { status, url });
    }

    let body = response
        .bytes()
        .await
        .map_err(GatewayError::UpstreamUnreachable)?;

    UpstreamJson::from_bytes(body)
}
