//! # Debug Bar CLI Module
//!
//! ## Available Commands
//!
//! - `serve` - Start the demo HTTP server (default)
//! - `render` - Print the overlay for a synthetic request
//! - `panels` - List the built-in panels in catalog order
//! - `config` - Print the effective configuration as TOML

mod commands;

use clap::{Parser, Subcommand};
use debugbar_core::OverlayError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Debug Bar demo host
///
/// Serves a small item store with the diagnostics overlay embedded.
#[derive(Parser, Debug)]
#[command(name = "debugbar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file (falls back to DEBUGBAR_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Only the server prints a banner; the other commands produce output meant for pipes.
    #[must_use]
    pub fn shows_banner(&self) -> bool {
        matches!(self.command, None | Some(Commands::Serve { .. })) && !self.json_mode
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the demo HTTP server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the overlay for a synthetic request
    Render {
        /// Request path
        #[arg(long, default_value = "/")]
        path: String,

        /// Raw query string, without `?`
        #[arg(long)]
        query: Option<String>,

        /// Request method
        #[arg(short, long, default_value = "GET")]
        method: String,
    },

    /// List the built-in panels
    Panels,

    /// Print the effective configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), OverlayError> {
    let config = crate::config::AppConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Serve { host, port }) => cmd_serve(config, host, port).await,
        Some(Commands::Render {
            path,
            query,
            method,
        }) => cmd_render(&config, &method, &path, query.as_deref(), json_mode),
        Some(Commands::Panels) => cmd_panels(&config, json_mode),
        Some(Commands::Config) => cmd_config(&config),
        None => cmd_serve(config, None, None).await,
    }
}
