//! # API Request/Response Types
//!
//! JSON structures for the host's non-HTML endpoints.

use debugbar_core::{Asset, DisplayState, PanelSummary, RenderedOverlay, StatusEntry};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ITEM RESPONSE
// =============================================================================

/// Result of storing an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutItemResponse {
    pub key: String,
    /// An earlier value was overwritten.
    pub replaced: bool,
}

/// Error body for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// =============================================================================
// OVERLAY SUMMARY
// =============================================================================

/// One render cycle, without the markup body.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub display: DisplayState,
    pub body_classes: Vec<String>,
    pub toggle: String,
    pub statuses: Vec<StatusEntry>,
    pub panels: Vec<PanelSummary>,
    pub assets: Vec<Asset>,
}

impl From<RenderedOverlay> for SummaryResponse {
    fn from(overlay: RenderedOverlay) -> Self {
        let assets = overlay.assets.ordered().into_iter().cloned().collect();
        Self {
            display: overlay.display,
            body_classes: overlay.body_classes,
            toggle: overlay.toggle,
            statuses: overlay.statuses,
            panels: overlay.panels,
            assets,
        }
    }
}
