//! Command-line interface for the move server.

use clap::{Parser, Subcommand};

/// Chess session - move server for the draggable-board client
#[derive(Parser, Debug)]
#[command(name = "chess_session")]
#[command(about = "Serves engine counter-moves over HTTP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP move server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
