//! # CLI Command Implementations

use crate::api::{self, SummaryResponse};
use crate::config::AppConfig;
use crate::facts;
use debugbar_core::{
    AssetRegistry, DebugBar, EventLog, InitContext, OverlayError, RenderedOverlay, RequestInfo,
};

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), OverlayError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    println!("Debug Bar demo host starting...");
    println!();
    println!("Configuration:");
    println!("  Address:    {}", config.server.addr());
    println!("  Query flag: ?{}", config.overlay.query_flag);
    println!(
        "  Operators:  {}",
        if config.operator_key.is_some() {
            "Bearer key required"
        } else {
            "everyone"
        }
    );
    println!();

    api::run_server(&config).await
}

// =============================================================================
// RENDER COMMAND
// =============================================================================

/// Run one render cycle for a synthetic request and print it.
pub fn cmd_render(
    config: &AppConfig,
    method: &str,
    path: &str,
    query: Option<&str>,
    json_mode: bool,
) -> Result<(), OverlayError> {
    let overlay = render_synthetic(config, method, path, query)?;

    if json_mode {
        let summary = SummaryResponse::from(overlay);
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| OverlayError::IoError(format!("Cannot encode summary: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    print!("{}", overlay.assets.render_head());
    println!("{}", overlay.toggle);
    if overlay.is_empty() {
        tracing::info!("no visible panels for this request");
    } else {
        print!("{}", overlay.body);
    }
    print!("{}", overlay.assets.render_footer());
    Ok(())
}

/// Render cycle for a request that never reached a server.
pub fn render_synthetic(
    config: &AppConfig,
    method: &str,
    path: &str,
    query: Option<&str>,
) -> Result<RenderedOverlay, OverlayError> {
    let bar = DebugBar::new(config.overlay.clone())?;
    let mut request = RequestInfo::new(method.to_ascii_uppercase(), path);
    if let Some(query) = query {
        request = request.with_query(query);
    }
    bar.render_request(&request, &EventLog::new(), &facts::collect(None))
}

// =============================================================================
// PANELS COMMAND
// =============================================================================

/// List the catalog's panels with their titles and declared assets.
pub fn cmd_panels(config: &AppConfig, json_mode: bool) -> Result<(), OverlayError> {
    let bar = DebugBar::new(config.overlay.clone())?;
    let mut assets = AssetRegistry::new();
    let mut ctx = InitContext {
        assets: &mut assets,
        config: bar.config(),
    };
    let panels = bar.catalog().instantiate(&mut ctx)?;

    if json_mode {
        let list: Vec<_> = panels
            .iter()
            .map(|p| serde_json::json!({ "id": p.id(), "title": p.title() }))
            .collect();
        let text = serde_json::to_string_pretty(&serde_json::json!({
            "panels": list,
            "assets": assets.ordered(),
        }))
        .map_err(|e| OverlayError::IoError(format!("Cannot encode panels: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!("Panels ({}):", panels.len());
    for (index, panel) in panels.iter().enumerate() {
        println!("  {:>2}. {:<18} {}", index + 1, panel.id().as_str(), panel.title());
    }
    if !assets.is_empty() {
        println!();
        println!("Panel assets:");
        for asset in assets.ordered() {
            println!("  {:?} {} -> {}", asset.kind, asset.handle, asset.src);
        }
    }
    Ok(())
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Print the effective configuration, operator key redacted.
pub fn cmd_config(config: &AppConfig) -> Result<(), OverlayError> {
    print!("{}", config.to_toml()?);
    Ok(())
}
