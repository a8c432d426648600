//! Search request/response types

use serde::{Deserialize, Serialize};

use crate::infrastructure::services::RetrievalStatus;

/// Body of `POST /api/search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Body of `GET /api/search/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHealthResponse {
    pub status: String,
    pub vector_store: String,
    pub collection: String,
    pub collection_ready: bool,
    pub embedding_provider: String,
    pub embedding_model: String,
}

impl From<RetrievalStatus> for SearchHealthResponse {
    fn from(status: RetrievalStatus) -> Self {
        Self {
            status: "healthy".to_string(),
            vector_store: status.vector_store.to_string(),
            collection: status.collection,
            collection_ready: status.collection_ready,
            embedding_provider: status.embedding_provider.to_string(),
            embedding_model: status.embedding_model,
        }
    }
}
