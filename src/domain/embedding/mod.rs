//! Embedding provider domain models and traits

mod embedded;
mod exchange;
mod provider;

pub use embedded::{EmbeddedChunk, EmbeddingBatch, EmbeddingOutcome};
pub use exchange::{EmbeddingRequest, EmbeddingResponse};
pub use provider::EmbeddingProvider;

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
