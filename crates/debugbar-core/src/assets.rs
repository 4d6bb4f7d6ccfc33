//! # Asset Registry
//!
//! Declarations of the stylesheets and scripts the overlay needs on the page.
//! The registry only records and orders declarations; delivering the files is
//! the host's job.

use crate::markup::escape;
use serde::Serialize;
use std::collections::BTreeSet;

/// Kind of client-side asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Style,
    Script,
}

/// A declared stylesheet or script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub handle: String,
    pub kind: AssetKind,
    pub src: String,
    pub version: String,
    /// Handles that must be emitted before this asset.
    pub deps: Vec<String>,
    /// Scripts only: emit at the end of the page instead of in `<head>`.
    pub in_footer: bool,
}

/// Ordered asset declarations for one request.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: Vec<Asset>,
}

impl AssetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a stylesheet.
    pub fn enqueue_style(
        &mut self,
        handle: impl Into<String>,
        src: impl Into<String>,
        deps: &[&str],
        version: impl Into<String>,
    ) {
        self.enqueue(Asset {
            handle: handle.into(),
            kind: AssetKind::Style,
            src: src.into(),
            version: version.into(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
            in_footer: false,
        });
    }

    /// Declare a script.
    pub fn enqueue_script(
        &mut self,
        handle: impl Into<String>,
        src: impl Into<String>,
        deps: &[&str],
        version: impl Into<String>,
        in_footer: bool,
    ) {
        self.enqueue(Asset {
            handle: handle.into(),
            kind: AssetKind::Script,
            src: src.into(),
            version: version.into(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
            in_footer,
        });
    }

    /// Declare an asset. The first declaration of a handle per kind wins.
    pub fn enqueue(&mut self, asset: Asset) {
        if self.get(asset.kind, &asset.handle).is_some() {
            tracing::debug!(handle = %asset.handle, "asset already enqueued, keeping first declaration");
            return;
        }
        self.assets.push(asset);
    }

    #[must_use]
    pub fn get(&self, kind: AssetKind, handle: &str) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|a| a.kind == kind && a.handle == handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Assets in emission order: declaration order, with each asset's
    /// registered dependencies pulled in front of it. Unknown dependencies are
    /// skipped; dependency cycles are broken at the first repeated handle.
    #[must_use]
    pub fn ordered(&self) -> Vec<&Asset> {
        let mut done = BTreeSet::new();
        let mut visiting = BTreeSet::new();
        let mut out = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            self.visit(asset, &mut done, &mut visiting, &mut out);
        }
        out
    }

    fn visit<'a>(
        &'a self,
        asset: &'a Asset,
        done: &mut BTreeSet<(AssetKind, &'a str)>,
        visiting: &mut BTreeSet<(AssetKind, &'a str)>,
        out: &mut Vec<&'a Asset>,
    ) {
        let key = (asset.kind, asset.handle.as_str());
        if done.contains(&key) || !visiting.insert(key) {
            return;
        }
        for dep in &asset.deps {
            match self.get(asset.kind, dep) {
                Some(dependency) => self.visit(dependency, done, visiting, out),
                None => tracing::debug!(handle = %asset.handle, dependency = %dep, "dependency not registered"),
            }
        }
        visiting.remove(&key);
        done.insert(key);
        out.push(asset);
    }

    /// Tags for `<head>`: stylesheets and scripts not marked for the footer.
    #[must_use]
    pub fn render_head(&self) -> String {
        self.ordered()
            .into_iter()
            .filter(|a| !a.in_footer)
            .map(render_tag)
            .collect()
    }

    /// Tags for the end of `<body>`: footer scripts.
    #[must_use]
    pub fn render_footer(&self) -> String {
        self.ordered()
            .into_iter()
            .filter(|a| a.in_footer)
            .map(render_tag)
            .collect()
    }
}

fn render_tag(asset: &Asset) -> String {
    let href = format!("{}?ver={}", asset.src, asset.version);
    match asset.kind {
        AssetKind::Style => format!(
            "<link rel=\"stylesheet\" id=\"{}-css\" href=\"{}\" />\n",
            escape(&asset.handle),
            escape(&href)
        ),
        AssetKind::Script => format!(
            "<script id=\"{}-js\" src=\"{}\"></script>\n",
            escape(&asset.handle),
            escape(&href)
        ),
    }
}

// =============================================================================
// TESTS
// =============================================================================
