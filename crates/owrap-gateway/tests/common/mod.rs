//! Shared helpers for gateway integration tests.
//!
//! Provides an in-process fake Ollama server bound to an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;

/// Exact bytes the fake returns from `/api/tags`. Key order is deliberately
/// not alphabetical so re-serialization would be detected.
pub const TAGS_BODY: &str = r#"{"models":[{"name":"llama3:8b","size":4661224676,"digest":"365c0bd3c000","details":{"format":"gguf","family":"llama"}}],"zeta":true,"alpha":null}"#;

/// Exact bytes the fake returns from `/api/generate`.
pub const GENERATE_BODY: &str = r#"{"model":"m","created_at":"2024-05-01T00:00:00Z","response":"Hello","done":true}"#;

/// How the fake should answer.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// 200 with the canned JSON bodies.
    Ok,
    /// The given status with a JSON error body.
    Status(StatusCode),
    /// 200 with a body that is not JSON.
    Garbage,
}

#[derive(Clone)]
struct FakeState {
    behavior: Behavior,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
}

/// Handle to a running fake Ollama server.
pub struct FakeOllama {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl FakeOllama {
    pub async fn start(behavior: Behavior) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            behavior,
            received: Arc::clone(&received),
        };

        let app = Router::new()
            .route("/api/tags", get(tags))
            .route("/api/generate", post(generate))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, received }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Bodies received on `/api/generate`, in arrival order.
    pub fn received(&self) -> Vec<serde_json::Value> {
        self.received.lock().unwrap().clone()
    }
}

fn respond(behavior: Behavior, ok_body: &'static str) -> Response {
    match behavior {
        Behavior::Ok => (
            [("content-type", "application/json; charset=utf-8")],
            ok_body,
        )
            .into_response(),
        Behavior::Status(status) => (
            status,
            Json(serde_json::json!({ "error": "model 'missing' not found" })),
        )
            .into_response(),
        Behavior::Garbage => (StatusCode::OK, "<html>not json</html>").into_response(),
    }
}

async fn tags(State(state): State<FakeState>) -> Response {
    respond(state.behavior, TAGS_BODY)
}

async fn generate(
    State(state): State<FakeState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.received.lock().unwrap().push(body);
    respond(state.behavior, GENERATE_BODY)
}

/// A loopback port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
