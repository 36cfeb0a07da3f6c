//! Chess session move server.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use chess_session::RandomEngine;
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host } => run_server(host, port).await,
    }
}

/// Run the HTTP move server
async fn run_server(host: String, port: u16) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(port, "Server will listen on http://{}:{}", host, port);

    let addr: std::net::SocketAddr = format!("{}:{}", host, port).parse()?;
    chess_session::serve(addr, Arc::new(RandomEngine)).await
}
