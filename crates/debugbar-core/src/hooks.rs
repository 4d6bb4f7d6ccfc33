//! # Extension Hooks
//!
//! Each extension point is an explicit, ordered list of typed callbacks:
//!
//! - [`FilterChain`]: transforms that receive the current value and return its
//!   replacement, applied in registration order
//! - [`Trigger`]: fire-and-forget actions that only write into the value they
//!   are handed (markup, asset declarations)
//!
//! Hooks are registered while the host starts up. Once the [`Hooks`] set is
//! shared between requests it is read-only.

use crate::assets::AssetRegistry;
use crate::markup::Markup;
use crate::registry::PanelList;
use crate::types::StatusEntry;
use std::collections::BTreeSet;
use std::fmt;

type Transform<T> = Box<dyn Fn(T) -> T + Send + Sync>;
type Action<A> = Box<dyn Fn(&mut A) + Send + Sync>;

/// Ordered pipeline of value transforms.
pub struct FilterChain<T> {
    transforms: Vec<Transform<T>>,
}

impl<T> Default for FilterChain<T> {
    fn default() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }
}

impl<T> FilterChain<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform; it runs after every transform added before it.
    pub fn add(&mut self, transform: impl Fn(T) -> T + Send + Sync + 'static) -> &mut Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Run `value` through every transform. An empty chain is the identity.
    pub fn apply(&self, value: T) -> T {
        self.transforms.iter().fold(value, |acc, f| f(acc))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl<T> fmt::Debug for FilterChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

/// Ordered list of fire-and-forget actions.
pub struct Trigger<A> {
    actions: Vec<Action<A>>,
}

impl<A> Default for Trigger<A> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
        }
    }
}

impl<A> Trigger<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, action: impl Fn(&mut A) + Send + Sync + 'static) -> &mut Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Run every action against `target`, in registration order.
    pub fn fire(&self, target: &mut A) {
        for action in &self.actions {
            action(target);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<A> fmt::Debug for Trigger<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("actions", &self.actions.len())
            .finish()
    }
}

/// Every extension point the overlay exposes.
///
/// Panels a `panels` filter adds go through `init` once the filtered list is
/// committed, so they set their titles and declare assets like catalog panels.
#[derive(Debug, Default)]
pub struct Hooks {
    /// Replace the whole panel collection: add, remove or reorder.
    pub panels: FilterChain<PanelList>,
    /// Replace the status strip entries.
    pub statuses: FilterChain<Vec<StatusEntry>>,
    /// Classes of the toggle control.
    pub classes: FilterChain<BTreeSet<String>>,
    /// Label of the toggle control.
    pub title: FilterChain<String>,
    /// Markup appended after the panel content regions.
    pub trailing: Trigger<Markup>,
    /// Asset declarations, fired once right after the overlay's own assets.
    pub enqueue_assets: Trigger<AssetRegistry>,
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
