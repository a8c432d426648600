//! Vector store backend trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::{SearchHit, VectorRecord};
use crate::domain::DomainError;

/// Shape of the collection every backend maintains
///
/// Auto-generated integer id, a float vector of `dimensions`, a bounded text
/// field and a JSON metadata field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSchema {
    pub name: String,
    pub dimensions: usize,
    /// Bound on the text field in UTF-8 bytes
    pub max_text_length: usize,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>, dimensions: usize, max_text_length: usize) -> Self {
        Self {
            name: name.into(),
            dimensions,
            max_text_length,
        }
    }
}

/// A single attempt against a vector database
///
/// Backends do not retry; retry, alerting and lazy collection creation live
/// in the gateway that wraps them.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Backend name for logs and metrics
    fn backend_name(&self) -> &'static str;

    /// Create the collection if it does not exist
    async fn ensure_collection(&self, schema: &CollectionSchema) -> Result<(), DomainError>;

    /// Insert records; ids are returned in input order
    async fn insert(
        &self,
        schema: &CollectionSchema,
        records: &[VectorRecord],
    ) -> Result<Vec<String>, DomainError>;

    /// Nearest neighbours by L2 distance, ascending
    async fn search(
        &self,
        schema: &CollectionSchema,
        vector: &[f32],
        limit: usize,
        nprobe: u32,
    ) -> Result<Vec<SearchHit>, DomainError>;
}
