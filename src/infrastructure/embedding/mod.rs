//! Embedding provider implementations and the retrying generator

mod generator;
mod openai;

pub use generator::EmbeddingGenerator;
pub use openai::OpenAiEmbeddingProvider;
