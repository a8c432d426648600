//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding model backends
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate an embedding for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Short backend name for logs and status
    fn provider_name(&self) -> &'static str;
}
