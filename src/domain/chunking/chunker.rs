//! Fixed-size token window chunker

use std::sync::Arc;

use tracing::debug;

use super::{decode_lossy, Chunk, Tokenizer};
use crate::domain::DomainError;

/// Splits text into non-overlapping windows of at most `max_tokens` tokens
///
/// Windows tile the token stream exactly: the first starts at 0, each next one
/// starts where the previous ended, and only the last may be shorter.
#[derive(Debug, Clone)]
pub struct TokenChunker {
    tokenizer: Option<Arc<dyn Tokenizer>>,
}

impl TokenChunker {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            tokenizer: Some(tokenizer),
        }
    }

    /// A chunker whose tokenizer failed to load
    pub fn unavailable() -> Self {
        Self { tokenizer: None }
    }

    pub fn tokenizer_name(&self) -> Option<&str> {
        self.tokenizer.as_deref().map(|t| t.name())
    }

    pub fn chunk(&self, text: &str, max_tokens: usize) -> Result<Vec<Chunk>, DomainError> {
        if max_tokens == 0 {
            return Err(DomainError::validation("max_tokens must be greater than 0"));
        }

        let tokenizer = self
            .tokenizer
            .as_deref()
            .ok_or_else(|| DomainError::tokenizer_unavailable("No tokenizer is loaded"))?;

        if text.is_empty() {
            return Ok(Vec::new());
        }

        let tokens = tokenizer.encode(text);

        let chunks: Vec<Chunk> = tokens
            .chunks(max_tokens)
            .enumerate()
            .map(|(index, window)| {
                let start = index * max_tokens;
                Chunk::new(index, start, start + window.len(), decode_lossy(tokenizer, window))
            })
            .collect();

        debug!(
            tokenizer = tokenizer.name(),
            total_tokens = tokens.len(),
            chunks = chunks.len(),
            max_tokens,
            "Chunked text"
        );

        Ok(chunks)
    }
}
