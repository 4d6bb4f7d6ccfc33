//! # API Endpoint Handlers
//!
//! HTML handlers do their work first, so the event log is complete, and then
//! run the overlay's render cycle as the page's footer step.

use super::{
    AppState,
    auth::Operator,
    types::{ErrorResponse, HealthResponse, PutItemResponse, SummaryResponse},
};
use crate::{facts, page};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use debugbar_core::{
    Deprecation, DeprecationKind, EventLog, NoticeLevel, RequestInfo, markup::Markup,
};
use std::sync::Arc;

type Log = Extension<Arc<EventLog>>;

// =============================================================================
// HELPERS
// =============================================================================

fn request_info(method: &Method, uri: &Uri, route: &str) -> RequestInfo {
    let info = RequestInfo::new(method.as_str(), uri.path()).with_route(route);
    match uri.query() {
        Some(query) => info.with_query(query),
        None => info,
    }
}

/// Footer step: inject the overlay for operators.
///
/// A failed render cycle is logged and the page is served without diagnostics.
fn finish_page(
    state: &AppState,
    operator: Operator,
    log: &EventLog,
    request: &RequestInfo,
    page: String,
) -> String {
    if !operator.0 {
        return page;
    }
    let facts = facts::collect(Some(state.store.facts()));
    match state.bar.render_request(request, log, &facts) {
        Ok(overlay) => page::inject(&page, &overlay),
        Err(e) => {
            tracing::error!(path = %request.path, error = %e, "overlay render failed, serving page without it");
            page
        }
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// PAGE HANDLERS
// =============================================================================

/// Demo index listing every stored item.
pub async fn index_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Extension(log): Log,
    method: Method,
    uri: Uri,
) -> Html<String> {
    let request = request_info(&method, &uri, "/");
    let keys = state.store.keys(&log).await;

    let mut content = Markup::new();
    content.raw("<h1>Items</h1>\n");
    if keys.is_empty() {
        content.raw("<p>No items yet. <code>PUT /items/{key}</code> stores one.</p>\n");
    } else {
        content.raw("<ul>\n");
        for key in &keys {
            content
                .raw("<li><a href=\"/items/")
                .text(key)
                .raw("\">")
                .text(key)
                .raw("</a></li>\n");
        }
        content.raw("</ul>\n");
    }
    content.raw("<p>Add <code>?debug-bar</code> to the address to open the overlay.</p>");

    let page = page::document("Debug Bar demo", &content);
    Html(finish_page(&state, operator, &log, &request, page))
}

/// Item page.
pub async fn get_item_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Extension(log): Log,
    Path(key): Path<String>,
    method: Method,
    uri: Uri,
) -> (StatusCode, Html<String>) {
    let request = request_info(&method, &uri, "/items/{key}");
    item_page(&state, operator, &log, &request, &key).await
}

/// Deprecated alias of the item page.
pub async fn legacy_item_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Extension(log): Log,
    Path(key): Path<String>,
    method: Method,
    uri: Uri,
) -> (StatusCode, Html<String>) {
    let request = request_info(&method, &uri, "/item/{key}");
    log.deprecated(Deprecation {
        kind: DeprecationKind::Function,
        name: "GET /item/{key}".to_string(),
        version: "0.8.0".to_string(),
        replacement: Some("GET /items/{key}".to_string()),
        location: Some(uri.path().to_string()),
    });
    item_page(&state, operator, &log, &request, &key).await
}

async fn item_page(
    state: &AppState,
    operator: Operator,
    log: &EventLog,
    request: &RequestInfo,
    key: &str,
) -> (StatusCode, Html<String>) {
    let mut content = Markup::new();
    content.raw("<h1>").text(key).raw("</h1>\n");

    let status = match state.store.get(key, log).await {
        Ok(Some(value)) => {
            content.raw("<pre>").text(&value).raw("</pre>");
            StatusCode::OK
        }
        Ok(None) => {
            log.notice(
                NoticeLevel::Notice,
                format!("undefined item '{}'", key),
                Some(request.path.clone()),
            );
            content.raw("<p>No such item.</p>");
            StatusCode::NOT_FOUND
        }
        Err(e) => {
            log.notice(NoticeLevel::Warning, e.to_string(), Some(request.path.clone()));
            content.raw("<p>").text(&e.to_string()).raw("</p>");
            StatusCode::BAD_REQUEST
        }
    };

    let page = page::document(key, &content);
    (status, Html(finish_page(state, operator, log, request, page)))
}

// =============================================================================
// ITEM WRITE HANDLER
// =============================================================================

/// Store the request body under `key`.
pub async fn put_item_handler(
    State(state): State<AppState>,
    Extension(log): Log,
    Path(key): Path<String>,
    body: String,
) -> Response {
    match state.store.put(&key, body, &log).await {
        Ok(previous) => {
            let replaced = previous.is_some();
            tracing::debug!(key = %key, replaced, "item stored");
            (StatusCode::OK, Json(PutItemResponse { key, replaced })).into_response()
        }
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "item rejected");
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
    }
}

// =============================================================================
// SUMMARY HANDLER
// =============================================================================

/// Run a render cycle for this request and report it as JSON.
pub async fn summary_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Extension(log): Log,
    method: Method,
    uri: Uri,
) -> Response {
    if !operator.0 {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Unauthorized")),
        )
            .into_response();
    }

    let request = request_info(&method, &uri, "/__debug-bar/summary");
    let facts = facts::collect(Some(state.store.facts()));
    match state.bar.render_request(&request, &log, &facts) {
        Ok(overlay) => (StatusCode::OK, Json(SummaryResponse::from(overlay))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "overlay summary failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}
