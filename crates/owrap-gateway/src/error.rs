//! Gateway error type and its HTTP mapping.
//!
//! Every failure an operation can hit ends up here and is rendered as
//! `{"detail": "..."}`. Upstream failures of any kind become a 500; the
//! upstream's own status code is never propagated to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::ErrorBody;

/// Prefix for every failure that involved talking to the upstream.
pub const UPSTREAM_FAILURE_PREFIX: &str = "Failed to connect to Ollama";

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connecting to, sending to, or reading from the upstream failed.
    #[error("{}: {}", UPSTREAM_FAILURE_PREFIX, error_chain(.0))]
    UpstreamUnreachable(#[source] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("{}: {} for url: {url}", UPSTREAM_FAILURE_PREFIX, describe_status(.status))]
    UpstreamStatus { status: StatusCode, url: String },

    /// The upstream answered 2xx but the body is not JSON.
    #[error("{}: {}", UPSTREAM_FAILURE_PREFIX, .0)]
    InvalidUpstreamJson(#[source] serde_json::Error),

    /// Anything else. Rendered without a prefix.
    #[error("{0}")]
    Unexpected(String),

    /// The inbound request body is missing fields or has the wrong types.
    #[error("{0}")]
    InvalidRequest(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Join an error and its sources, e.g.
/// `error sending request for url (...): tcp connect error: Connection refused`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

/// Render a status the way HTTP client libraries usually phrase it,
/// e.g. `404 Client Error: Not Found`.
fn describe_status(status: &StatusCode) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let class = if status.is_client_error() {
        "Client Error"
    } else if status.is_server_error() {
        "Server Error"
    } else {
        "Error"
    };
    format!("{} {class}: {reason}", status.as_u16())
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        if status.is_server_error() {
            error!(status = %status.as_u16(), "{detail}");
        } else {
            warn!(status = %status.as_u16(), "{detail}");
        }

        (status, Json(ErrorBody::new(detail))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = GatewayError::UpstreamStatus {
            status: StatusCode::NOT_FOUND,
            url: "http://localhost:11434/api/tags".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to connect to Ollama: 404 Client Error: Not Found for url: http://localhost:11434/api/tags"
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_server_error_message() {
        let err = GatewayError::UpstreamStatus {
            status: StatusCode::BAD_GATEWAY,
            url: "http://h:1/api/generate".to_string(),
        };
        assert!(err.to_string().contains("502 Server Error: Bad Gateway"));
    }

    #[test]
    fn test_invalid_json_is_prefixed() {
        let Err(source) = serde_json::from_slice::<serde_json::Value>(b"<html>") else {
            panic!("expected a parse error");
        };
        let err = GatewayError::InvalidUpstreamJson(source);
        assert!(err.to_string().starts_with(UPSTREAM_FAILURE_PREFIX));
    }

    #[test]
    fn test_unexpected_has_no_prefix() {
        let err = GatewayError::Unexpected("boom".to_string());
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_request_is_422() {
        let err = GatewayError::InvalidRequest("missing field `prompt`".to_string());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
