//! Chunk entity

use serde::{Deserialize, Serialize};

/// A contiguous window of tokens from one document
///
/// `end_token` is exclusive, so `num_tokens == end_token - start_token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub start_token: usize,
    pub end_token: usize,
    pub text: String,
    pub num_tokens: usize,
}

impl Chunk {
    pub fn new(index: usize, start_token: usize, end_token: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            start_token,
            end_token,
            text: text.into(),
            num_tokens: end_token.saturating_sub(start_token),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.num_tokens == 0
    }
}
