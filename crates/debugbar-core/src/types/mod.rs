//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the overlay:
//! - Panel identity (`PanelId`)
//! - Status strip facts (`StatusEntry`)
//! - Lifecycle bookkeeping (`LifecycleStage`, `PanelPhase`)
//! - Error types (`OverlayError`, `PanelError`)

use crate::primitives::{MENU_LINK_PREFIX, MENU_TARGET_PREFIX, STATUS_PREFIX};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// PANEL IDENTITY
// =============================================================================

/// Stable identity of a panel.
///
/// Defaults to the short name of the implementing type and drives the element
/// ids of the panel's navigation link and content region. Two panels sharing an
/// identity render duplicate element ids; callers must keep identities unique.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PanelId(String);

impl PanelId {
    /// Create an identity from an explicit name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Identity derived from a type name, with module path and generics stripped.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        let full = std::any::type_name::<T>();
        let base = full.split('<').next().unwrap_or(full);
        let short = base.rsplit("::").next().unwrap_or(base);
        Self(short.to_string())
    }

    /// Get the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Element id of the panel's navigation link.
    #[must_use]
    pub fn link_id(&self) -> String {
        format!("{}{}", MENU_LINK_PREFIX, self.0)
    }

    /// Element id of the panel's content region.
    #[must_use]
    pub fn target_id(&self) -> String {
        format!("{}{}", MENU_TARGET_PREFIX, self.0)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// STATUS ENTRY
// =============================================================================

/// A single fact in the overlay's status strip.
///
/// `title` and `data` are emitted as markup without escaping; only the slug is
/// escaped when it becomes part of an element id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub slug: String,
    pub title: String,
    pub data: Option<String>,
}

impl StatusEntry {
    /// Create an entry with a data value.
    #[must_use]
    pub fn new(slug: impl Into<String>, title: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            data: Some(data.into()),
        }
    }

    /// Create an entry that renders its title only.
    #[must_use]
    pub fn title_only(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            data: None,
        }
    }

    /// The data value, if present and non-empty.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref().filter(|d| !d.is_empty())
    }

    /// Element id of the entry (`debug-status-<slug>`).
    #[must_use]
    pub fn element_id(&self) -> String {
        format!("{}{}", STATUS_PREFIX, self.slug)
    }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Per-request lifecycle states of the render orchestrator.
///
/// `Rendered` and `Aborted` are terminal: a fatal panel failure moves the
/// orchestrator to `Aborted` and every later step is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    Uninitialized,
    Populated,
    Filtered,
    Rendered,
    Aborted,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleStage::Uninitialized => "uninitialized",
            LifecycleStage::Populated => "populated",
            LifecycleStage::Filtered => "filtered",
            LifecycleStage::Rendered => "rendered",
            LifecycleStage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// The panel contract step a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelPhase {
    Init,
    Prerender,
    Render,
}

impl fmt::Display for PanelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanelPhase::Init => "init",
            PanelPhase::Prerender => "prerender",
            PanelPhase::Render => "render",
        };
        f.write_str(name)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Failure reported by a panel from one of its contract steps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PanelError {
    message: String,
}

impl PanelError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while building or rendering the overlay.
///
/// - No silent failures
/// - Lifecycle misuse is reported, never panics
#[derive(Debug, Error)]
pub enum OverlayError {
    /// A panel failed in one of its contract steps.
    #[error("Panel {panel} failed during {phase}: {source}")]
    Panel {
        panel: PanelId,
        phase: PanelPhase,
        #[source]
        source: PanelError,
    },

    /// The registry was already finalized (second finalize, or late registration).
    #[error("Panel registry is already finalized")]
    RegistryFinalized,

    /// A lifecycle step was invoked from the wrong state.
    #[error("Lifecycle out of order: expected {expected}, found {found}")]
    OutOfOrder {
        expected: LifecycleStage,
        found: LifecycleStage,
    },

    /// The overlay configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl OverlayError {
    /// Wrap a panel failure with the panel's identity and contract step.
    #[must_use]
    pub fn panel(panel: PanelId, phase: PanelPhase, source: PanelError) -> Self {
        Self::Panel {
            panel,
            phase,
            source,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
