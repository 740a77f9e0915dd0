//! Command-line surface.

use clap::{Parser, Subcommand};

use crate::config::ServerConfig;

/// DAML MCP tool server.
#[derive(Debug, Parser)]
#[command(name = "mcp-server", version, about)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP transport and begin serving requests.
    Serve(ServerConfig),
}
