//! # Panel Contract
//!
//! Every diagnostic module implements [`Panel`]. The orchestrator drives the
//! contract in a fixed order per request:
//!
//! 1. `init` once, right after construction
//! 2. `prerender` once per render cycle, for every registered panel
//! 3. `is_visible` once, right after `prerender`
//! 4. `title` and `render`, only for visible panels
//!
//! Panels never catch their own failures; the orchestrator decides whether a
//! failure aborts the overlay or is isolated to the panel.

use crate::assets::AssetRegistry;
use crate::config::OverlayConfig;
use crate::events::EventLog;
use crate::markup::Markup;
use crate::request::RequestInfo;
use crate::types::{PanelError, PanelId};

/// Setup context passed to [`Panel::init`].
pub struct InitContext<'a> {
    pub assets: &'a mut AssetRegistry,
    pub config: &'a OverlayConfig,
}

/// Read-only data available to [`Panel::prerender`].
#[derive(Debug, Clone, Copy)]
pub struct PanelContext<'a> {
    pub request: &'a RequestInfo,
    pub events: &'a EventLog,
    pub config: &'a OverlayConfig,
}

/// A self-contained diagnostic module.
pub trait Panel: Send {
    /// Stable identity; the implementing type's short name by default.
    fn id(&self) -> PanelId {
        PanelId::of::<Self>()
    }

    /// One-time setup: set the title, register the panel's own assets.
    fn init(&mut self, ctx: &mut InitContext<'_>) -> Result<(), PanelError>;

    /// Display title. May contain markup and is emitted unescaped.
    fn title(&self) -> &str;

    /// Gather data and decide visibility.
    fn prerender(&mut self, ctx: &PanelContext<'_>) -> Result<(), PanelError>;

    /// Visibility decided by the most recent `prerender`.
    fn is_visible(&self) -> bool;

    /// Emit the panel's content region.
    fn render(&self, out: &mut Markup) -> Result<(), PanelError>;
}

/// Title and visibility bookkeeping most panels embed.
///
/// Panels start visible; `prerender` narrows that down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelBase {
    title: String,
    visible: bool,
}

impl Default for PanelBase {
    fn default() -> Self {
        Self {
            title: String::new(),
            visible: true,
        }
    }
}

impl PanelBase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
