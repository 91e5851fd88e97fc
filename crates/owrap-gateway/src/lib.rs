#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod upstream;

pub use config::{GatewayConfig, UpstreamConfig};
pub use error::{GatewayError, GatewayResult};
pub use models::{ErrorBody, GenerateRequest, HealthResponse};
pub use server::{GatewayState, router, serve};
pub use upstream::{InferenceBackend, OllamaClient, UpstreamJson};
