//! # Debug Bar - demo host
//!
//! The binary embedding the Debug Bar diagnostics overlay.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     apps/debugbar (THE HOST)                    │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐     │
//! │  │   CLI       │    │   HTTP      │    │  MemStore        │     │
//! │  │  (clap)     │    │   (axum)    │    │  (event source)  │     │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘     │
//! │         │                  │                    │               │
//! │         └──────────────────┼────────────────────┘               │
//! │                            ▼                                    │
//! │                   ┌─────────────────┐                           │
//! │                   │  debugbar-core  │                           │
//! │                   │ (THE REGISTRY)  │                           │
//! │                   └─────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the demo server
//! debugbar serve --host 0.0.0.0 --port 8080
//!
//! # Print the overlay for a synthetic request
//! debugbar render --path /items/a --query debug-bar
//!
//! # Inspect the built-in panels and the effective configuration
//! debugbar panels
//! debugbar config
//! ```

use clap::Parser;
use debugbar::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // DEBUGBAR_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("DEBUGBAR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "debugbar=info,debugbar_core=info,tower_http=debug".into());

    // Logs go to stderr so `render` and `config` output stays clean.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && cli.shows_banner() {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  ┌───────────────────────────────┐
  │  Debug Bar  demo host v{:<7}│
  └───────────────────────────────┘
"#,
        env!("CARGO_PKG_VERSION")
    );
}
