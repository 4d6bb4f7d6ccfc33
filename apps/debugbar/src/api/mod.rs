//! # Debug Bar Host HTTP Module
//!
//! The demo host's HTTP server. HTML pages get the overlay injected for
//! operators; JSON endpoints never do.
//!
//! ## Endpoints
//!
//! - `GET /` - Demo page listing stored items
//! - `GET /items/{key}` - Item page
//! - `PUT /items/{key}` - Store an item (plain-text body)
//! - `GET /item/{key}` - Deprecated alias of `GET /items/{key}`
//! - `GET /health` - Health check
//! - `GET /__debug-bar/summary` - JSON summary of a render cycle (operators only)
//!
//! ## Security Configuration
//!
//! - `server.cors_origins` / `DEBUGBAR_CORS_ORIGINS`: comma-separated allowed
//!   origins, or "*" for all (default: localhost only)
//! - `operator_key` / `DEBUGBAR_OPERATOR_KEY`: if set, only requests carrying
//!   the Bearer key see diagnostics

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{Operator, is_operator};
pub use handlers::{
    get_item_handler, health_handler, index_handler, legacy_item_handler, put_item_handler,
    summary_handler,
};
pub use types::{ErrorResponse, HealthResponse, PutItemResponse, SummaryResponse};

use crate::config::AppConfig;
use crate::store::MemStore;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::get,
};
use debugbar_core::{DebugBar, OverlayError};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request bodies above this size are rejected.
const MAX_BODY_SIZE: usize = 128 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the overlay, built once, and the demo store.
#[derive(Clone)]
pub struct AppState {
    pub bar: Arc<DebugBar>,
    pub store: Arc<MemStore>,
    pub operator_key: Option<Arc<str>>,
    pub cors_origins: Option<String>,
}

impl AppState {
    #[must_use]
    pub fn new(bar: DebugBar, operator_key: Option<String>) -> Self {
        Self {
            bar: Arc::new(bar),
            store: Arc::new(MemStore::new()),
            operator_key: operator_key.map(Arc::from),
            cors_origins: None,
        }
    }

    /// State for `config`, with the built-in panel set.
    pub fn from_config(config: &AppConfig) -> Result<Self, OverlayError> {
        let bar = DebugBar::new(config.overlay.clone())?;
        let mut state = Self::new(bar, config.operator_key.clone());
        state.cors_origins = config.server.cors_origins.clone();
        Ok(state)
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `"*"`: allows all origins
/// - unset: localhost only
/// - otherwise: the comma-separated list
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();
    restricted_cors(origins)
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Event log - fresh per request
/// 5. Operator tagging
pub fn create_router(state: AppState) -> Router {
    if state.operator_key.is_some() {
        tracing::info!("Operator key set: overlay limited to authenticated operators");
    } else {
        tracing::warn!(
            "No operator key configured - every request sees the diagnostics overlay! \
             Set DEBUGBAR_OPERATOR_KEY to restrict it."
        );
    }

    let cors = build_cors_layer(state.cors_origins.as_deref());

    Router::new()
        .route("/", get(handlers::index_handler))
        .route(
            "/items/{key}",
            get(handlers::get_item_handler).put(handlers::put_item_handler),
        )
        .route("/item/{key}", get(handlers::legacy_item_handler))
        .route("/health", get(handlers::health_handler))
        .route("/__debug-bar/summary", get(handlers::summary_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::operator_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::event_log_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(config: &AppConfig) -> Result<(), OverlayError> {
    let state = AppState::from_config(config)?;
    let router = create_router(state);
    let addr = config.server.addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| OverlayError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Debug Bar demo host listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| OverlayError::IoError(format!("Server error: {}", e)))
}
