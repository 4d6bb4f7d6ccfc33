//! # Visibility Gate
//!
//! Decides the overlay's initial on-screen state from the request's query
//! flag. This is presentation only: it never changes which panels run or
//! render.

use crate::config::OverlayConfig;
use crate::primitives::{MAXIMIZED_CLASS, VISIBLE_CLASS};
use crate::request::RequestInfo;
use serde::{Deserialize, Serialize};

/// Initial display state of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    Expanded,
    Collapsed,
}

impl DisplayState {
    #[must_use]
    pub fn is_expanded(self) -> bool {
        matches!(self, DisplayState::Expanded)
    }
}

/// Query-flag toggle for the overlay's initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityGate {
    flag: String,
}

impl VisibilityGate {
    #[must_use]
    pub fn new(flag: impl Into<String>) -> Self {
        Self { flag: flag.into() }
    }

    #[must_use]
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.query_flag.clone())
    }

    #[must_use]
    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Expanded when the flag key is present, collapsed otherwise.
    #[must_use]
    pub fn classify(&self, request: &RequestInfo) -> DisplayState {
        if request.has_query_key(&self.flag) {
            DisplayState::Expanded
        } else {
            DisplayState::Collapsed
        }
    }

    /// Classes the host adds to its `<body>` element.
    #[must_use]
    pub fn body_classes(&self, request: &RequestInfo) -> Vec<String> {
        let mut classes = vec![MAXIMIZED_CLASS.to_string()];
        if self.classify(request).is_expanded() {
            classes.push(VISIBLE_CLASS.to_string());
        }
        classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_present_expands() {
        let gate = VisibilityGate::new("debug-bar");
        let request = RequestInfo::new("GET", "/").with_query("debug-bar");
        assert_eq!(gate.classify(&request), DisplayState::Expanded);
        assert_eq!(
            gate.body_classes(&request),
            vec!["debug-bar-maximized", "debug-bar-visible"]
        );
    }

    #[test]
    fn flag_absent_collapses() {
        let gate = VisibilityGate::new("debug-bar");
        let request = RequestInfo::new("GET", "/").with_query("other=1");
        assert_eq!(gate.classify(&request), DisplayState::Collapsed);
        assert_eq!(gate.body_classes(&request), vec!["debug-bar-maximized"]);
    }

    #[test]
    fn flag_value_is_irrelevant() {
        let gate = VisibilityGate::new("debug-bar");
        for query in ["debug-bar=", "debug-bar=0", "debug-bar=false", "x=1&debug-bar=yes"] {
            let request = RequestInfo::new("GET", "/").with_query(query);
            assert!(gate.classify(&request).is_expanded(), "query {query}");
        }
    }
}
