//! CLI entry point - the composition root.
//!
//! Reads configuration, builds the upstream client, binds the listener and
//! serves until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use owrap_cli::{Cli, logging};
use owrap_gateway::{OllamaClient, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before parsing so clap's env fallbacks see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.gateway_config();
    let upstream = Arc::new(OllamaClient::new(&config.upstream)?);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let cancel = CancellationToken::new();
    let mut server = tokio::spawn(serve(listener, upstream, cancel.clone()));

    tokio::select! {
        result = &mut server => return result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Ctrl-C received, shutting down");
        }
    }
    cancel.cancel();

    server.await?
}
