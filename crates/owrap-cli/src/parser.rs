//! Command-line parser.
//!
//! Every option also reads an environment variable, so the gateway can be
//! configured entirely from the environment (or a `.env` file).

use clap::Parser;

use owrap_gateway::config::{
    DEFAULT_LISTEN_HOST, DEFAULT_LISTEN_PORT, DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_PORT,
    GATEWAY_HOST_ENV, GATEWAY_PORT_ENV, GatewayConfig, OLLAMA_HOST_ENV, OLLAMA_PORT_ENV,
    UpstreamConfig,
};

/// Pass-through HTTP gateway for a local Ollama server.
#[derive(Debug, Parser)]
#[command(name = "owrap")]
#[command(about = "Ollama API wrapper: forwards /models and /generate to Ollama")]
#[command(version)]
pub struct Cli {
    /// Interface to listen on
    #[arg(long, env = GATEWAY_HOST_ENV, default_value = DEFAULT_LISTEN_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = GATEWAY_PORT_ENV, default_value_t = DEFAULT_LISTEN_PORT)]
    pub port: u16,

    /// Host of the Ollama server
    #[arg(long, env = OLLAMA_HOST_ENV, default_value = DEFAULT_OLLAMA_HOST)]
    pub ollama_host: String,

    /// Port of the Ollama server
    #[arg(long, env = OLLAMA_PORT_ENV, default_value_t = DEFAULT_OLLAMA_PORT)]
    pub ollama_port: u16,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the parsed options into a gateway configuration.
    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::default()
            .with_listen(self.host.clone(), self.port)
            .with_upstream(UpstreamConfig::new(self.ollama_host.clone(), self.ollama_port))
    }
}
