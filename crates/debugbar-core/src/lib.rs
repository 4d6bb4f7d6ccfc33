//! # debugbar-core
//!
//! Panel registry and render lifecycle for the Debug Bar diagnostics overlay.
//!
//! A host builds one [`DebugBar`] at startup (configuration, panel catalog,
//! hooks) and shares it. For every request it collects an [`EventLog`], then
//! runs a [`RenderOrchestrator`] that initializes the panels, filters them
//! through the panel hook, prerenders every one of them and renders the
//! visible ones into a navigation strip and content regions.
//!
//! ## Architectural Constraints
//!
//! - Synchronous and request-scoped: no async, no network dependencies
//! - Hooks are explicit, typed and ordered; no global registries
//! - Lifecycle misuse is reported as [`OverlayError`], never a panic

// =============================================================================
// MODULES
// =============================================================================

pub mod assets;
pub mod bar;
pub mod config;
pub mod events;
pub mod gate;
pub mod hooks;
pub mod markup;
pub mod orchestrator;
pub mod panel;
pub mod panels;
pub mod primitives;
pub mod registry;
pub mod request;
pub mod status;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{LifecycleStage, OverlayError, PanelError, PanelId, PanelPhase, StatusEntry};

// =============================================================================
// RE-EXPORTS: Registry & Lifecycle
// =============================================================================

pub use assets::{Asset, AssetKind, AssetRegistry};
pub use bar::DebugBar;
pub use config::OverlayConfig;
pub use gate::{DisplayState, VisibilityGate};
pub use hooks::{FilterChain, Hooks, Trigger};
pub use markup::Markup;
pub use orchestrator::{PanelSummary, RenderOrchestrator, RenderedOverlay};
pub use panel::{InitContext, Panel, PanelBase, PanelContext};
pub use registry::{PanelCatalog, PanelList, PanelRegistry};

// =============================================================================
// RE-EXPORTS: Request Data
// =============================================================================

pub use events::{
    CacheStats, Deprecation, DeprecationKind, Event, EventLog, HitMiss, Notice, NoticeLevel,
    QueryRecord,
};
pub use request::RequestInfo;
pub use status::{RuntimeFacts, StoreFacts};
