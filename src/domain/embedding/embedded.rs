//! Per-chunk embedding results

use serde::{Deserialize, Serialize};

use crate::domain::chunking::Chunk;

/// Outcome of embedding one chunk: a vector or the error that prevented it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingOutcome {
    Vector(Vec<f32>),
    Failed(String),
}

/// A chunk paired with exactly one embedding outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub outcome: EmbeddingOutcome,
}

impl EmbeddedChunk {
    pub fn embedded(chunk: Chunk, vector: Vec<f32>) -> Self {
        Self {
            chunk,
            outcome: EmbeddingOutcome::Vector(vector),
        }
    }

    pub fn failed(chunk: Chunk, error: impl Into<String>) -> Self {
        Self {
            chunk,
            outcome: EmbeddingOutcome::Failed(error.into()),
        }
    }

    pub fn vector(&self) -> Option<&[f32]> {
        match &self.outcome {
            EmbeddingOutcome::Vector(v) => Some(v),
            EmbeddingOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            EmbeddingOutcome::Vector(_) => None,
            EmbeddingOutcome::Failed(e) => Some(e),
        }
    }

    pub fn is_embedded(&self) -> bool {
        self.vector().is_some()
    }
}

/// Embedded chunks in input order
#[derive(Debug, Clone, Default)]
pub struct EmbeddingBatch {
    chunks: Vec<EmbeddedChunk>,
}

impl EmbeddingBatch {
    pub fn new(chunks: Vec<EmbeddedChunk>) -> Self {
        Self { chunks }
    }

    pub fn chunks(&self) -> &[EmbeddedChunk] {
        &self.chunks
    }

    pub fn into_chunks(self) -> Vec<EmbeddedChunk> {
        self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunks that received a vector
    pub fn successes(&self) -> impl Iterator<Item = &EmbeddedChunk> {
        self.chunks.iter().filter(|c| c.is_embedded())
    }

    /// Chunks that failed, with their error
    pub fn failures(&self) -> impl Iterator<Item = (&EmbeddedChunk, &str)> {
        self.chunks
            .iter()
            .filter_map(|c| c.error().map(|e| (c, e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }
}
