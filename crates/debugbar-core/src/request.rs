//! # Request Metadata
//!
//! The slice of the host request the overlay needs: method, path, matched
//! route and decoded query parameters.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Request metadata captured by the host before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
    /// Route pattern the host matched, if it exposes one.
    pub route: Option<String>,
    /// Decoded query pairs in request order.
    pub query: Vec<(String, String)>,
}

impl RequestInfo {
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            route: None,
            query: Vec::new(),
        }
    }

    /// Replace the query pairs by decoding a raw query string (without `?`).
    #[must_use]
    pub fn with_query(mut self, raw: &str) -> Self {
        self.query = form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect();
        self
    }

    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Whether the query carries `key`, whatever its value.
    #[must_use]
    pub fn has_query_key(&self, key: &str) -> bool {
        self.query.iter().any(|(k, _)| k == key)
    }

    /// Re-encoded query string, empty when there are no parameters.
    #[must_use]
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_query_decodes_pairs() {
        let request = RequestInfo::new("GET", "/").with_query("a=1&b=hello%20world&flag");
        assert_eq!(
            request.query,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "hello world".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn has_query_key_ignores_value() {
        let request = RequestInfo::new("GET", "/").with_query("debug-bar=0");
        assert!(request.has_query_key("debug-bar"));
        assert!(!request.has_query_key("debug"));
    }

    #[test]
    fn query_string_round_trips_simple_pairs() {
        let request = RequestInfo::new("GET", "/").with_query("a=1&b=2");
        assert_eq!(request.query_string(), "a=1&b=2");
        assert_eq!(RequestInfo::new("GET", "/").query_string(), "");
    }
}
