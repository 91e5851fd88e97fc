//! Request and response bodies for the gateway's HTTP surface.
//!
//! Upstream responses are not modelled here: they are opaque JSON and are
//! passed through as raw bytes (see [`crate::upstream::UpstreamJson`]).

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateRequest {
    /// Upstream model name, e.g. `llama3:8b`.
    pub model: String,
    /// Prompt text.
    pub prompt: String,
    /// Accepted and forwarded; the gateway never streams its own response.
    #[serde(default, deserialize_with = "lax_bool")]
    pub stream: Option<bool>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: None,
        }
    }

    /// Body sent to `POST /api/generate`, with `stream` resolved to a boolean.
    #[must_use]
    pub fn upstream_body(&self) -> UpstreamGenerateBody<'_> {
        UpstreamGenerateBody {
            model: &self.model,
            prompt: &self.prompt,
            stream: self.stream.unwrap_or(false),
        }
    }
}

/// Accept the loose boolean spellings clients commonly send: `true`,
/// `1`, `1.0`, `"yes"`, `"on"`, `"t"`, `"y"` and their false counterparts.
/// String forms are case-insensitive. `null` means unset.
fn lax_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let invalid = || <D::Error as de::Error>::custom("stream: input should be a valid boolean");

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(flag)),
        Some(Value::Number(number)) => match number.as_f64() {
            Some(n) if n == 0.0 => Ok(Some(false)),
            Some(n) if n == 1.0 => Ok(Some(true)),
            _ => Err(invalid()),
        },
        Some(Value::String(text)) => match text.to_ascii_lowercase().as_str() {
            "0" | "off" | "f" | "false" | "n" | "no" => Ok(Some(false)),
            "1" | "on" | "t" | "true" | "y" | "yes" => Ok(Some(true)),
            _ => Err(invalid()),
        },
        Some(_) => Err(invalid()),
    }
}

/// Outbound body for Ollama's `/api/generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpstreamGenerateBody<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    /// Base URL of the configured upstream.
    pub ollama_url: String,
}

impl HealthResponse {
    pub fn healthy(ollama_url: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            ollama_url: ollama_url.into(),
        }
    }
}

/// Error body shared by every non-2xx gateway response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
