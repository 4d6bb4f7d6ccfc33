//! # Render Orchestrator
//!
//! Drives one request through the overlay lifecycle:
//!
//! ```text
//! Uninitialized --populate--> Populated --filter--> Filtered --render--> Rendered
//!        \___________________________\__________________\______ fatal ----> Aborted
//! ```
//!
//! - `populate`: declare assets, build one panel per catalog entry, register them
//! - `filter`: finalize the registry through the panel filter, prerender every
//!   panel in order, keep the visible ones
//! - `render`: status strip, navigation, content regions, trailing markup
//!
//! A panel failure aborts the lifecycle unless `isolate_panel_failures` is on,
//! in which case the panel's content region carries an error placeholder and
//! the remaining panels still render.

use crate::assets::AssetRegistry;
use crate::bar::DebugBar;
use crate::events::EventLog;
use crate::gate::DisplayState;
use crate::markup::{Markup, escape};
use crate::panel::{InitContext, Panel, PanelContext};
use crate::primitives::ROOT_ID;
use crate::registry::{PanelRegistry, init_panel};
use crate::request::RequestInfo;
use crate::status::{RuntimeFacts, derived_statuses};
use crate::types::{LifecycleStage, OverlayError, PanelError, PanelId, PanelPhase, StatusEntry};
use serde::Serialize;

// =============================================================================
// OUTPUT
// =============================================================================

/// One panel that made it into the rendered overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelSummary {
    pub id: PanelId,
    pub title: String,
    /// The panel failed and its region holds an error placeholder.
    pub failed: bool,
}

/// Everything a request's render cycle produced.
#[derive(Debug, Clone)]
pub struct RenderedOverlay {
    /// Toggle control for the host chrome.
    pub toggle: String,
    /// Overlay body. Empty when no panel is visible.
    pub body: String,
    /// Classes for the host `<body>` element.
    pub body_classes: Vec<String>,
    pub display: DisplayState,
    /// Status strip after the status filter. Empty when the body is.
    pub statuses: Vec<StatusEntry>,
    /// Panels in navigation order.
    pub panels: Vec<PanelSummary>,
    /// Stylesheets and scripts the page must include.
    pub assets: AssetRegistry,
}

impl RenderedOverlay {
    /// No visible panel, so no overlay chrome.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

struct Slot {
    panel: Box<dyn Panel>,
    failure: Option<(PanelPhase, PanelError)>,
}

/// Request-scoped lifecycle driver. Obtain one from [`DebugBar::orchestrator`].
pub struct RenderOrchestrator<'a> {
    bar: &'a DebugBar,
    stage: LifecycleStage,
    assets: AssetRegistry,
    registry: PanelRegistry,
    slots: Vec<Slot>,
    prerendered: usize,
}

impl<'a> RenderOrchestrator<'a> {
    pub(crate) fn new(bar: &'a DebugBar) -> Self {
        Self {
            bar,
            stage: LifecycleStage::Uninitialized,
            assets: AssetRegistry::new(),
            registry: PanelRegistry::new(),
            slots: Vec::new(),
            prerendered: 0,
        }
    }

    #[must_use]
    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    /// Assets declared so far.
    #[must_use]
    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Number of panels whose prerender ran in this cycle.
    #[must_use]
    pub fn prerendered(&self) -> usize {
        self.prerendered
    }

    /// Identities of the panels that survived filtering, in order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<PanelId> {
        self.slots.iter().map(|slot| slot.panel.id()).collect()
    }

    fn expect_stage(&self, expected: LifecycleStage) -> Result<(), OverlayError> {
        if self.stage != expected {
            return Err(OverlayError::OutOfOrder {
                expected,
                found: self.stage,
            });
        }
        Ok(())
    }

    fn advance(&mut self, next: LifecycleStage) {
        tracing::debug!(from = %self.stage, to = %next, "overlay lifecycle transition");
        self.stage = next;
    }

    fn abort(&mut self, error: OverlayError) -> OverlayError {
        tracing::error!(stage = %self.stage, error = %error, "overlay lifecycle aborted");
        self.stage = LifecycleStage::Aborted;
        self.slots.clear();
        error
    }

    /// `Uninitialized -> Populated`: declare assets and register the catalog's panels.
    pub fn populate(&mut self) -> Result<(), OverlayError> {
        self.expect_stage(LifecycleStage::Uninitialized)?;
        let bar = self.bar;

        self.assets = bar.enqueue_assets();
        let mut ctx = InitContext {
            assets: &mut self.assets,
            config: bar.config(),
        };
        let panels = match bar.catalog().instantiate(&mut ctx) {
            Ok(panels) => panels,
            Err(e) => return Err(self.abort(e)),
        };
        for panel in panels.into_panels() {
            self.registry.register(panel)?;
        }

        self.advance(LifecycleStage::Populated);
        Ok(())
    }

    /// Register an extra panel before filtering. Its `init` runs right away;
    /// a failure aborts the lifecycle.
    pub fn register(&mut self, mut panel: Box<dyn Panel>) -> Result<(), OverlayError> {
        self.expect_stage(LifecycleStage::Populated)?;
        let bar = self.bar;
        let mut ctx = InitContext {
            assets: &mut self.assets,
            config: bar.config(),
        };
        if let Err(e) = init_panel(panel.as_mut(), &mut ctx) {
            return Err(self.abort(e));
        }
        self.registry.register(panel)
    }

    /// `Populated -> Filtered`: finalize (initializing panels the filter
    /// added), prerender every panel, keep the visible ones.
    ///
    /// Returns the number of visible panels.
    pub fn filter(&mut self, request: &RequestInfo, events: &EventLog) -> Result<usize, OverlayError> {
        self.expect_stage(LifecycleStage::Populated)?;
        let bar = self.bar;

        let config = bar.config();
        let mut registry = std::mem::take(&mut self.registry);
        let mut init_ctx = InitContext {
            assets: &mut self.assets,
            config,
        };
        if let Err(e) = registry.finalize(&bar.hooks().panels, &mut init_ctx) {
            return Err(self.abort(e));
        }

        let ctx = PanelContext {
            request,
            events,
            config,
        };

        for mut panel in registry.into_panels() {
            self.prerendered += 1;
            match panel.prerender(&ctx) {
                Ok(()) if panel.is_visible() => self.slots.push(Slot {
                    panel,
                    failure: None,
                }),
                Ok(()) => tracing::debug!(panel = %panel.id(), "panel hidden after prerender"),
                Err(source) if config.isolate_panel_failures => {
                    tracing::warn!(panel = %panel.id(), error = %source, "panel prerender failed, isolating");
                    self.slots.push(Slot {
                        panel,
                        failure: Some((PanelPhase::Prerender, source)),
                    });
                }
                Err(source) => {
                    let error = OverlayError::panel(panel.id(), PanelPhase::Prerender, source);
                    return Err(self.abort(error));
                }
            }
        }

        self.advance(LifecycleStage::Filtered);
        Ok(self.slots.len())
    }

    /// `Filtered -> Rendered`: emit the overlay markup.
    ///
    /// With no visible panel the body is empty: no chrome, no status strip.
    pub fn render(
        &mut self,
        request: &RequestInfo,
        facts: &RuntimeFacts,
    ) -> Result<RenderedOverlay, OverlayError> {
        self.expect_stage(LifecycleStage::Filtered)?;
        let bar = self.bar;
        let isolate = bar.config().isolate_panel_failures;

        let gate = bar.gate();
        let mut rendered = RenderedOverlay {
            toggle: bar.render_toggle(),
            body: String::new(),
            body_classes: bar.body_classes(request),
            display: gate.classify(request),
            statuses: Vec::new(),
            panels: Vec::new(),
            assets: self.assets.clone(),
        };

        let slots = std::mem::take(&mut self.slots);
        if slots.is_empty() {
            tracing::debug!("no visible panels, overlay skipped");
            self.advance(LifecycleStage::Rendered);
            return Ok(rendered);
        }

        let statuses = bar
            .hooks()
            .statuses
            .apply(derived_statuses(facts, bar.config()));

        let mut out = Markup::with_capacity(8 * 1024);
        out.raw(&format!("<div id=\"{}\">\n", ROOT_ID));
        out.raw(concat!(
            "<div id=\"debug-bar-actions\">",
            "<span class=\"maximize\">+</span>",
            "<span class=\"restore\">&ndash;</span>",
            "<span class=\"close\">&times;</span>",
            "</div>\n"
        ));
        render_statuses(&mut out, &statuses);
        render_navigation(&mut out, &slots);

        out.raw("<div id=\"debug-menu-targets\">\n");
        for (index, slot) in slots.iter().enumerate() {
            let id = slot.panel.id();
            let mut content = Markup::new();
            let outcome = match &slot.failure {
                Some((phase, source)) => Err((*phase, source.clone())),
                None => slot
                    .panel
                    .render(&mut content)
                    .map_err(|source| (PanelPhase::Render, source)),
            };

            let failed = match outcome {
                Ok(()) => false,
                Err((phase, source)) if isolate => {
                    if phase == PanelPhase::Render {
                        tracing::warn!(panel = %id, error = %source, "panel render failed, isolating");
                    }
                    content = failure_placeholder(phase, &source);
                    true
                }
                Err((phase, source)) => {
                    return Err(self.abort(OverlayError::panel(id, phase, source)));
                }
            };

            out.raw(&format!(
                "<div id=\"{}\" class=\"debug-menu-target\"{}>\n",
                escape(&id.target_id()),
                if index == 0 { " style=\"display: block\"" } else { "" }
            ));
            out.append(content);
            out.raw("\n</div>\n");

            rendered.panels.push(PanelSummary {
                id,
                title: slot.panel.title().to_string(),
                failed,
            });
        }
        out.raw("</div>\n");

        let mut trailing = Markup::new();
        bar.hooks().trailing.fire(&mut trailing);
        out.append(trailing);
        out.raw("</div>\n");

        rendered.body = out.into_string();
        rendered.statuses = statuses;
        self.advance(LifecycleStage::Rendered);
        Ok(rendered)
    }

    /// Run the whole lifecycle for one request.
    pub fn run(
        mut self,
        request: &RequestInfo,
        events: &EventLog,
        facts: &RuntimeFacts,
    ) -> Result<RenderedOverlay, OverlayError> {
        self.populate()?;
        self.filter(request, events)?;
        self.render(request, facts)
    }
}

fn render_statuses(out: &mut Markup, statuses: &[StatusEntry]) {
    out.raw("<div id=\"debug-bar-info\">\n<div id=\"debug-status\">\n");
    for status in statuses {
        out.raw(&format!(
            "<div id=\"{}\" class=\"debug-status\"><div class=\"debug-status-title\">{}</div>",
            escape(&status.element_id()),
            status.title
        ));
        if let Some(data) = status.data() {
            out.raw(&format!("<div class=\"debug-status-data\">{}</div>", data));
        }
        out.raw("</div>\n");
    }
    out.raw("</div>\n</div>\n");
}

fn render_navigation(out: &mut Markup, slots: &[Slot]) {
    out.raw("<div id=\"debug-bar-menu\">\n<ul id=\"debug-menu-links\">\n");
    for (index, slot) in slots.iter().enumerate() {
        let id = slot.panel.id();
        // Titles may carry markup; panels escape their own content.
        out.raw(&format!(
            "<li><a id=\"{}\" class=\"debug-menu-link{}\" href=\"#{}\">{}</a></li>\n",
            escape(&id.link_id()),
            if index == 0 { " current" } else { "" },
            escape(&id.target_id()),
            slot.panel.title()
        ));
    }
    out.raw("</ul>\n</div>\n");
}

fn failure_placeholder(phase: PanelPhase, source: &PanelError) -> Markup {
    let mut out = Markup::new();
    out.raw("<div class=\"debug-bar-panel-error\"><h3>Panel failed during ")
        .text(&phase.to_string())
        .raw("</h3><p>")
        .text(source.message())
        .raw("</p></div>");
    out
}
