//! # Operator Authentication
//!
//! Decides whether a request belongs to a privileged operator, who gets the
//! overlay. Unlike a hard gate, a non-operator request is still served; it
//! just never sees diagnostics.
//!
//! ## Configuration
//!
//! - `operator_key` in the config file, or `DEBUGBAR_OPERATOR_KEY`
//!
//! Send the key in the Authorization header:
//! ```text
//! Authorization: Bearer <operator-key>
//! ```

use super::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

/// Request extension: whether the caller may see the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator(pub bool);

/// Whether `headers` carry the expected operator key.
///
/// With no key configured every caller is an operator.
#[must_use]
pub fn is_operator(headers: &HeaderMap, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    let Some(header_value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let provided = header_value.strip_prefix("Bearer ").unwrap_or(header_value);

    // Pad both sides so ct_eq always runs over the same number of bytes.
    let provided_bytes = provided.as_bytes();
    let expected_bytes = expected.as_bytes();
    let max_len = provided_bytes.len().max(expected_bytes.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided_bytes.len()].copy_from_slice(provided_bytes);
    padded_expected[..expected_bytes.len()].copy_from_slice(expected_bytes);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided_bytes.len() == expected_bytes.len()
}

/// Tag every request with its [`Operator`] status.
pub async fn operator_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let operator = is_operator(request.headers(), state.operator_key.as_deref());
    if !operator && request.headers().contains_key(header::AUTHORIZATION) {
        tracing::warn!(
            event = "auth_failure",
            reason = "invalid_operator_key",
            path = %request.uri().path(),
            "operator key rejected"
        );
    }
    request.extensions_mut().insert(Operator(operator));
    next.run(request).await
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).expect("header"),
        );
        headers
    }

    #[test]
    fn no_key_means_everyone() {
        assert!(is_operator(&HeaderMap::new(), None));
    }

    #[test]
    fn bearer_and_raw_keys_accepted() {
        assert!(is_operator(&headers("Bearer s3cret"), Some("s3cret")));
        assert!(is_operator(&headers("s3cret"), Some("s3cret")));
    }

    #[test]
    fn wrong_or_missing_key_rejected() {
        assert!(!is_operator(&HeaderMap::new(), Some("s3cret")));
        assert!(!is_operator(&headers("Bearer s3cre"), Some("s3cret")));
        assert!(!is_operator(&headers("Bearer s3cret!"), Some("s3cret")));
    }
}
