//! Search endpoints

use axum::extract::State;
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, Json, SearchHealthResponse, SearchRequest};
use crate::domain::SearchResponse;

/// `POST /api/search`
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    debug!(max_results = ?request.max_results, "Search request");

    let response = state
        .retrieval
        .search(&request.query, request.max_results)
        .await?;

    Ok(Json(response))
}

/// `GET /api/search/health`
pub async fn search_health(State(state): State<AppState>) -> Json<SearchHealthResponse> {
    Json(SearchHealthResponse::from(state.retrieval.status()))
}
