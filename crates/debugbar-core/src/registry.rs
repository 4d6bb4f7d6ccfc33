//! # Panel Registry
//!
//! Three collections back the panel system:
//!
//! - [`PanelCatalog`]: process-wide, ordered list of panel factories. Built once
//!   at startup, read-only afterwards.
//! - [`PanelList`]: an ordered set of panel instances, each tagged with whether
//!   its `init` already ran. This is what the panel filter receives.
//! - [`PanelRegistry`]: the ordered panel instances of a single request.
//!   Populated from the catalog, finalized through the panel filter, then
//!   handed to the orchestrator.

use crate::hooks::FilterChain;
use crate::panel::{InitContext, Panel};
use crate::types::{OverlayError, PanelId, PanelPhase};
use std::fmt;

type PanelFactory = Box<dyn Fn() -> Box<dyn Panel> + Send + Sync>;

/// Run `init` on `panel`; a failure is fatal for the overlay.
pub(crate) fn init_panel(
    panel: &mut dyn Panel,
    ctx: &mut InitContext<'_>,
) -> Result<(), OverlayError> {
    panel.init(ctx).map_err(|source| {
        let id = panel.id();
        tracing::error!(panel = %id, error = %source, "panel init failed");
        OverlayError::panel(id, PanelPhase::Init, source)
    })
}

// =============================================================================
// PANEL LIST
// =============================================================================

struct Entry {
    panel: Box<dyn Panel>,
    initialized: bool,
}

/// Ordered panel collection handed to the panel filter.
///
/// Filters reorder, drop and add panels through its methods. Panels added with
/// [`PanelList::push`] or [`PanelList::insert`] are constructed but not yet
/// initialized; the registry runs their `init` when it commits the list.
#[derive(Default)]
pub struct PanelList {
    entries: Vec<Entry>,
}

impl PanelList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a freshly constructed panel.
    pub fn push(&mut self, panel: Box<dyn Panel>) {
        self.entries.push(Entry {
            panel,
            initialized: false,
        });
    }

    /// Insert a freshly constructed panel at `index`, or at the end when
    /// `index` is past it.
    pub fn insert(&mut self, index: usize, panel: Box<dyn Panel>) {
        let index = index.min(self.entries.len());
        self.entries.insert(
            index,
            Entry {
                panel,
                initialized: false,
            },
        );
    }

    pub(crate) fn push_initialized(&mut self, panel: Box<dyn Panel>) {
        self.entries.push(Entry {
            panel,
            initialized: true,
        });
    }

    /// Keep only the panels `keep` accepts, in order.
    pub fn retain(&mut self, mut keep: impl FnMut(&dyn Panel) -> bool) {
        self.entries.retain(|entry| keep(entry.panel.as_ref()));
    }

    pub fn reverse(&mut self) {
        self.entries.reverse();
    }

    /// Stable sort by a key derived from each panel.
    pub fn sort_by_key<K: Ord>(&mut self, mut key: impl FnMut(&dyn Panel) -> K) {
        self.entries.sort_by_key(|entry| key(entry.panel.as_ref()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Panels in order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Panel + 'static)> + '_ {
        self.entries.iter().map(|entry| entry.panel.as_ref())
    }

    /// Identities in order.
    #[must_use]
    pub fn ids(&self) -> Vec<PanelId> {
        self.iter().map(|p| p.id()).collect()
    }

    /// Initialize every panel added since construction, in list order.
    ///
    /// Returns how many were initialized. Stops at the first failure.
    pub(crate) fn init_pending(&mut self, ctx: &mut InitContext<'_>) -> Result<usize, OverlayError> {
        let mut count = 0;
        for entry in self.entries.iter_mut().filter(|e| !e.initialized) {
            init_panel(entry.panel.as_mut(), ctx)?;
            entry.initialized = true;
            count += 1;
        }
        Ok(count)
    }

    pub(crate) fn into_panels(self) -> Vec<Box<dyn Panel>> {
        self.entries.into_iter().map(|entry| entry.panel).collect()
    }
}

impl fmt::Debug for PanelList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelList")
            .field("panels", &self.ids())
            .finish()
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Ordered, explicitly registered panel factories.
#[derive(Default)]
pub struct PanelCatalog {
    factories: Vec<PanelFactory>,
}

impl PanelCatalog {
    /// A catalog with no panels.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a factory. Each request gets a fresh instance from it.
    pub fn register(
        &mut self,
        factory: impl Fn() -> Box<dyn Panel> + Send + Sync + 'static,
    ) -> &mut Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// Append a panel type constructed through `Default`.
    pub fn register_default<P>(&mut self) -> &mut Self
    where
        P: Panel + Default + 'static,
    {
        self.register(|| Box::new(P::default()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Construct and initialize one instance per factory, in catalog order.
    ///
    /// The first `init` failure aborts construction; no partial set is returned.
    pub fn instantiate(&self, ctx: &mut InitContext<'_>) -> Result<PanelList, OverlayError> {
        let mut panels = PanelList::new();
        for factory in &self.factories {
            let mut panel = factory();
            init_panel(panel.as_mut(), ctx)?;
            panels.push_initialized(panel);
        }
        Ok(panels)
    }
}

impl fmt::Debug for PanelCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelCatalog")
            .field("factories", &self.factories.len())
            .finish()
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Ordered panel instances for one request.
///
/// Registration order is preserved; the only way to reorder, drop or add
/// panels afterwards is the panel filter applied by [`PanelRegistry::finalize`].
#[derive(Default)]
pub struct PanelRegistry {
    panels: PanelList,
    finalized: bool,
}

impl PanelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a panel whose `init` already ran. No duplicate detection.
    ///
    /// Fails with [`OverlayError::RegistryFinalized`] once finalized.
    pub fn register(&mut self, panel: Box<dyn Panel>) -> Result<(), OverlayError> {
        if self.finalized {
            return Err(OverlayError::RegistryFinalized);
        }
        self.panels.push_initialized(panel);
        Ok(())
    }

    /// Hand the full collection to `filter`, commit what it returns and
    /// initialize the panels the filter added.
    ///
    /// Must run exactly once. A second call fails with
    /// [`OverlayError::RegistryFinalized`] and leaves the collection untouched.
    /// An `init` failure of an added panel is fatal, as for catalog panels.
    pub fn finalize(
        &mut self,
        filter: &FilterChain<PanelList>,
        ctx: &mut InitContext<'_>,
    ) -> Result<(), OverlayError> {
        if self.finalized {
            return Err(OverlayError::RegistryFinalized);
        }
        let registered = std::mem::take(&mut self.panels);
        let before = registered.len();
        self.panels = filter.apply(registered);
        self.finalized = true;
        let introduced = self.panels.init_pending(ctx)?;
        tracing::debug!(
            registered = before,
            introduced,
            finalized = self.panels.len(),
            "panel registry finalized"
        );
        Ok(())
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Panels in order. Restartable: every call yields the same sequence.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Panel + 'static)> + '_ {
        self.panels.iter()
    }

    /// Identities in order.
    #[must_use]
    pub fn ids(&self) -> Vec<PanelId> {
        self.panels.ids()
    }

    /// Give up the panels, e.g. to the orchestrator.
    #[must_use]
    pub fn into_panels(self) -> Vec<Box<dyn Panel>> {
        self.panels.into_panels()
    }
}

impl fmt::Debug for PanelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelRegistry")
            .field("panels", &self.ids())
            .field("finalized", &self.finalized)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
