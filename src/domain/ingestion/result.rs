//! Single-shot ingestion result

use serde::{Deserialize, Serialize};

use crate::domain::embedding::EmbeddedChunk;

/// Everything produced by one successful ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionResult {
    /// Random v4 UUID identifying the upload
    pub file_id: String,
    pub filename: String,
    /// Size of the original upload in bytes
    pub size: usize,
    /// Retrieval reference returned by blob storage
    pub storage_url: String,
    /// Full extracted text
    pub text: String,
    /// Chunks in index order, each with a vector or an embedding error
    pub chunks: Vec<EmbeddedChunk>,
    /// Vector store ids, one per stored chunk, in chunk order
    pub vector_ids: Vec<String>,
}

impl IngestionResult {
    pub fn embedding_failures(&self) -> usize {
        self.chunks.iter().filter(|c| !c.is_embedded()).count()
    }
}
