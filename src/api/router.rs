use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::documents;
use super::health;
use super::middleware::{access_log_middleware, metrics_middleware};
use super::search;
use super::state::AppState;
use super::types::Json;
use crate::config::ServerConfig;

/// Create a minimal router without state
/// Note: /ready endpoint is not available without state
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/", get(root))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .route("/api/health", get(health::health_check))
        // Documents
        .route("/api/documents/upload", post(documents::upload_document))
        .route(
            "/api/documents/upload/progress",
            post(documents::upload_document_with_progress),
        )
        // Search
        .route("/api/search", post(search::search))
        .route("/api/search/health", get(search::search_health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(server.request_body_limit_bytes))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(access_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    match cors_layer(&server.cors_allowed_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "RAG document search API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
