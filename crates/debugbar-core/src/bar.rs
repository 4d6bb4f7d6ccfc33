//! # Debug Bar
//!
//! The process-wide half of the overlay: configuration, panel catalog, hook
//! set and visibility gate. Built once while the host starts, then shared
//! read-only between requests. Each request gets its own
//! [`RenderOrchestrator`] from [`DebugBar::orchestrator`].

use crate::assets::AssetRegistry;
use crate::config::OverlayConfig;
use crate::events::EventLog;
use crate::gate::VisibilityGate;
use crate::hooks::Hooks;
use crate::markup::escape;
use crate::orchestrator::{RenderOrchestrator, RenderedOverlay};
use crate::panels::builtin_catalog;
use crate::primitives::{
    CORE_SCRIPT_HANDLE, CORE_SCRIPT_VERSION, CORE_STYLE_HANDLE, CORE_STYLE_VERSION, JQUERY_HANDLE,
    TOGGLE_ID,
};
use crate::registry::PanelCatalog;
use crate::request::RequestInfo;
use crate::status::RuntimeFacts;
use crate::types::OverlayError;
use std::collections::BTreeSet;

/// Shared overlay state.
#[derive(Debug)]
pub struct DebugBar {
    config: OverlayConfig,
    catalog: PanelCatalog,
    hooks: Hooks,
    gate: VisibilityGate,
}

impl DebugBar {
    /// Overlay with the built-in panel set.
    pub fn new(config: OverlayConfig) -> Result<Self, OverlayError> {
        Self::with_catalog(config, builtin_catalog())
    }

    /// Overlay with an explicit panel catalog.
    pub fn with_catalog(config: OverlayConfig, catalog: PanelCatalog) -> Result<Self, OverlayError> {
        config.validate()?;
        let gate = VisibilityGate::from_config(&config);
        tracing::debug!(panels = catalog.len(), flag = %gate.flag(), "debug bar configured");
        Ok(Self {
            config,
            catalog,
            hooks: Hooks::new(),
            gate,
        })
    }

    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &PanelCatalog {
        &self.catalog
    }

    /// Add panels before the bar is shared.
    pub fn catalog_mut(&mut self) -> &mut PanelCatalog {
        &mut self.catalog
    }

    #[must_use]
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Register hooks before the bar is shared.
    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    #[must_use]
    pub fn gate(&self) -> &VisibilityGate {
        &self.gate
    }

    /// The overlay's own stylesheet and script, then whatever the asset hook adds.
    #[must_use]
    pub fn enqueue_assets(&self) -> AssetRegistry {
        let mut assets = AssetRegistry::new();
        assets.enqueue_style(
            CORE_STYLE_HANDLE,
            self.config.asset_url("debug-bar", "css"),
            &[],
            CORE_STYLE_VERSION,
        );
        assets.enqueue_script(
            CORE_SCRIPT_HANDLE,
            self.config.asset_url("debug-bar", "js"),
            &[JQUERY_HANDLE],
            CORE_SCRIPT_VERSION,
            true,
        );
        self.hooks.enqueue_assets.fire(&mut assets);
        assets
    }

    /// Toggle control for the host chrome.
    ///
    /// Classes are escaped; the title may carry markup and is emitted as is.
    #[must_use]
    pub fn render_toggle(&self) -> String {
        let classes = self.hooks.classes.apply(BTreeSet::new());
        let classes: Vec<&str> = classes.iter().map(String::as_str).collect();
        let title = self.hooks.title.apply(self.config.title.clone());
        format!(
            "<a id=\"{}\" class=\"{}\">{}</a>",
            TOGGLE_ID,
            escape(&classes.join(" ")),
            title
        )
    }

    /// Classes the host adds to `<body>` for `request`.
    #[must_use]
    pub fn body_classes(&self, request: &RequestInfo) -> Vec<String> {
        self.gate.body_classes(request)
    }

    /// Fresh lifecycle driver for one request.
    #[must_use]
    pub fn orchestrator(&self) -> RenderOrchestrator<'_> {
        RenderOrchestrator::new(self)
    }

    /// Run a complete render cycle for one request.
    pub fn render_request(
        &self,
        request: &RequestInfo,
        events: &EventLog,
        facts: &RuntimeFacts,
    ) -> Result<RenderedOverlay, OverlayError> {
        self.orchestrator().run(request, events, facts)
    }
}
