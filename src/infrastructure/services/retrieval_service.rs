//! Semantic search over indexed chunks

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::domain::retrieval::{placeholder_answer, SearchQuery, SearchResponse, SearchResult};
use crate::domain::DomainError;
use crate::infrastructure::embedding::EmbeddingGenerator;
use crate::infrastructure::observability::record_search;
use crate::infrastructure::vector_store::VectorStoreGateway;

/// Snapshot for the search health endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalStatus {
    pub vector_store: &'static str,
    pub collection: String,
    pub collection_ready: bool,
    pub embedding_provider: &'static str,
    pub embedding_model: String,
}

/// Retrieval service trait for dependency injection
#[async_trait]
pub trait RetrievalServiceTrait: Send + Sync + fmt::Debug {
    async fn search(
        &self,
        query: &str,
        max_results: Option<usize>,
    ) -> Result<SearchResponse, DomainError>;

    fn status(&self) -> RetrievalStatus;
}

/// Embeds a query and looks up its nearest chunks
#[derive(Debug, Clone)]
pub struct RetrievalService {
    embeddings: EmbeddingGenerator,
    vectors: Arc<VectorStoreGateway>,
}

impl RetrievalService {
    pub fn new(embeddings: EmbeddingGenerator, vectors: Arc<VectorStoreGateway>) -> Self {
        Self {
            embeddings,
            vectors,
        }
    }

    #[instrument(skip(self, query), fields(chars = query.chars().count()))]
    pub async fn search(
        &self,
        query: &str,
        max_results: Option<usize>,
    ) -> Result<SearchResponse, DomainError> {
        let started = Instant::now();
        let result = self.run(query, max_results, started).await;

        match &result {
            Ok(response) => {
                record_search(true, response.total_results, started.elapsed());
                info!(
                    results = response.total_results,
                    processing_time = response.processing_time,
                    "Search completed"
                );
            }
            Err(e) => {
                record_search(false, 0, started.elapsed());
                warn!(error = %e, "Search failed");
            }
        }

        result
    }

    async fn run(
        &self,
        query: &str,
        max_results: Option<usize>,
        started: Instant,
    ) -> Result<SearchResponse, DomainError> {
        let query = SearchQuery::new(query, max_results)?;

        let vector = self.embeddings.embed_one(query.query()).await?;
        let hits = self.vectors.search(&vector, query.max_results()).await?;

        let results: Vec<SearchResult> = hits.into_iter().map(SearchResult::from).collect();

        Ok(SearchResponse {
            answer: placeholder_answer(query.query()),
            total_results: results.len(),
            results,
            processing_time: started.elapsed().as_secs_f64(),
        })
    }

    pub fn status(&self) -> RetrievalStatus {
        RetrievalStatus {
            vector_store: self.vectors.backend_name(),
            collection: self.vectors.schema().name.clone(),
            collection_ready: self.vectors.is_ready(),
            embedding_provider: self.embeddings.provider_name(),
            embedding_model: self.embeddings.model().to_string(),
        }
    }
}

#[async_trait]
impl RetrievalServiceTrait for RetrievalService {
    async fn search(
        &self,
        query: &str,
        max_results: Option<usize>,
    ) -> Result<SearchResponse, DomainError> {
        RetrievalService::search(self, query, max_results).await
    }

    fn status(&self) -> RetrievalStatus {
        RetrievalService::status(self)
    }
}
