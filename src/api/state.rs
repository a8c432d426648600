//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{IngestionServiceTrait, RetrievalServiceTrait};

/// Application state containing shared services using dynamic dispatch
#[derive(Debug, Clone)]
pub struct AppState {
    pub ingestion: Arc<dyn IngestionServiceTrait>,
    pub retrieval: Arc<dyn RetrievalServiceTrait>,
}

impl AppState {
    pub fn new(
        ingestion: Arc<dyn IngestionServiceTrait>,
        retrieval: Arc<dyn RetrievalServiceTrait>,
    ) -> Self {
        Self {
            ingestion,
            retrieval,
        }
    }
}
