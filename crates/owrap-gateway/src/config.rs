//! Gateway configuration.
//!
//! Configuration is resolved once at startup by the binary and is read-only
//! afterwards. The upstream half is combined into a base URL that every
//! forwarded request is built from.

/// Environment variable naming the upstream Ollama host.
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";
/// Environment variable naming the upstream Ollama port.
pub const OLLAMA_PORT_ENV: &str = "OLLAMA_PORT";
/// Environment variable naming the interface the gateway binds to.
pub const GATEWAY_HOST_ENV: &str = "GATEWAY_HOST";
/// Environment variable naming the port the gateway binds to.
pub const GATEWAY_PORT_ENV: &str = "GATEWAY_PORT";

pub const DEFAULT_OLLAMA_HOST: &str = "localhost";
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;
pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";
pub const DEFAULT_LISTEN_PORT: u16 = 8000;

/// Location of the upstream inference server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Host name or address of the Ollama server.
    pub host: String,
    /// Port the Ollama server listens on.
    pub port: u16,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_PORT)
    }
}

impl UpstreamConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Root address of the upstream, e.g. `http://localhost:11434`.
    ///
    /// No trailing slash; API paths are appended as `/api/...`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Full configuration for one gateway process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Interface to bind the HTTP listener to.
    pub host: String,
    /// Port to bind the HTTP listener to.
    pub port: u16,
    /// Where requests are forwarded.
    pub upstream: UpstreamConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LISTEN_HOST.to_string(),
            port: DEFAULT_LISTEN_PORT,
            upstream: UpstreamConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Set the upstream location.
    #[must_use]
    pub fn with_upstream(mut self, upstream: UpstreamConfig) -> Self {
        self.upstream = upstream;
        self
    }

    /// Set the listen address.
    #[must_use]
    pub fn with_listen(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        assert_eq!(
            UpstreamConfig::default().base_url(),
            "http://localhost:11434"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let upstream = UpstreamConfig::new("ollama.internal", 8081);
        assert_eq!(upstream.base_url(), "http://ollama.internal:8081");
    }

    #[test]
    fn test_gateway_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:8000");
        assert_eq!(config.upstream, UpstreamConfig::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = GatewayConfig::default()
            .with_listen("127.0.0.1", 9000)
            .with_upstream(UpstreamConfig::new("gpu-box", 11500));
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
        assert_eq!(config.upstream.base_url(), "http://gpu-box:11500");
    }
}
