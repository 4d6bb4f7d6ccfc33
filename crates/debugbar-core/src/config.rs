//! # Overlay Configuration
//!
//! Settings that shape a render cycle. The host loads these from its own
//! configuration source; every field has a default so partial files work.

use crate::primitives::{
    DEFAULT_ASSET_BASE_URL, DEFAULT_DEBUG_FLAG_LABEL, DEFAULT_QUERY_FLAG, DEFAULT_TITLE,
};
use crate::types::OverlayError;
use serde::{Deserialize, Serialize};

/// Configuration for the overlay and its built-in panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Query parameter that expands the overlay on load. Only its presence matters.
    pub query_flag: String,

    /// Initial label of the toggle control, before title hooks run.
    pub title: String,

    /// Whether the host runs with verbose debugging. When off, the status strip
    /// carries a warning entry.
    pub debug_enabled: bool,

    /// Name shown in that warning entry.
    pub debug_flag_label: String,

    /// Whether the host records data-store queries for the queries panel.
    pub record_queries: bool,

    /// Serve unminified `.dev` bundles.
    pub script_debug: bool,

    /// URL prefix for overlay assets.
    pub asset_base_url: String,

    /// Catch panel failures at the panel boundary and render a placeholder
    /// instead of aborting the whole overlay.
    pub isolate_panel_failures: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            query_flag: DEFAULT_QUERY_FLAG.to_string(),
            title: DEFAULT_TITLE.to_string(),
            debug_enabled: false,
            debug_flag_label: DEFAULT_DEBUG_FLAG_LABEL.to_string(),
            record_queries: true,
            script_debug: false,
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            isolate_panel_failures: false,
        }
    }
}

impl OverlayConfig {
    /// Reject configurations that cannot produce a usable overlay.
    pub fn validate(&self) -> Result<(), OverlayError> {
        if self.query_flag.trim().is_empty() {
            return Err(OverlayError::Config(
                "query_flag must not be empty".to_string(),
            ));
        }
        if self.asset_base_url.is_empty() {
            return Err(OverlayError::Config(
                "asset_base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Bundle suffix: `.dev` when `script_debug` is on.
    #[must_use]
    pub fn asset_suffix(&self) -> &'static str {
        if self.script_debug { ".dev" } else { "" }
    }

    /// URL of a bundled asset, e.g. `asset_url("debug-bar", "css")`.
    #[must_use]
    pub fn asset_url(&self, name: &str, extension: &str) -> String {
        let base = self.asset_base_url.trim_end_matches('/');
        format!("{}/{}{}.{}", base, name, self.asset_suffix(), extension)
    }
}
