//! # Middleware Module
//!
//! Per-request event log: a fresh [`EventLog`] goes into the request
//! extensions before the handler runs, so the store and the overlay panels of
//! one request share it and nothing leaks across requests.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use debugbar_core::EventLog;
use std::sync::Arc;

/// Install a fresh event log for the request.
pub async fn event_log_middleware(mut request: Request<Body>, next: Next) -> Response {
    let log = Arc::new(EventLog::new());
    request.extensions_mut().insert(Arc::clone(&log));

    let response = next.run(request).await;
    tracing::debug!(events = log.len(), "request event log closed");
    response
}
