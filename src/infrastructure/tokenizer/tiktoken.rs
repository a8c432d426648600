//! BPE tokenizer backed by tiktoken-rs

use std::fmt;

use tiktoken_rs::CoreBPE;
use tracing::{info, warn};

use crate::domain::{DomainError, Tokenizer};

/// Embedding models share the `gpt-3.5-turbo` encoding (`cl100k_base`)
const MODEL_ALIASES: &[(&str, &str)] = &[
    ("text-embedding-3-small", "gpt-3.5-turbo"),
    ("text-embedding-3-large", "gpt-3.5-turbo"),
    ("text-embedding-ada-002", "gpt-3.5-turbo"),
];

const FALLBACK_ENCODING: &str = "cl100k_base";

pub struct TiktokenTokenizer {
    bpe: CoreBPE,
    name: String,
}

impl TiktokenTokenizer {
    /// Load the encoding used by `model`
    ///
    /// Unknown models fall back to `cl100k_base`.
    pub fn for_model(model: &str) -> Result<Self, DomainError> {
        let lookup = MODEL_ALIASES
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, alias)| *alias)
            .unwrap_or(model);

        match tiktoken_rs::get_bpe_from_model(lookup) {
            Ok(bpe) => {
                info!(model, encoding_model = lookup, "Loaded tokenizer");
                Ok(Self {
                    bpe,
                    name: format!("tiktoken:{}", lookup),
                })
            }
            Err(e) => {
                warn!(model, error = %e, "Unknown tokenizer model, falling back to {}", FALLBACK_ENCODING);
                Self::cl100k()
            }
        }
    }

    /// Load `cl100k_base` directly
    pub fn cl100k() -> Result<Self, DomainError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| {
            DomainError::tokenizer_unavailable(format!("Failed to load {}: {}", FALLBACK_ENCODING, e))
        })?;

        Ok(Self {
            bpe,
            name: FALLBACK_ENCODING.to_string(),
        })
    }
}

impl fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("name", &self.name)
            .finish()
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_ordinary(text)
    }

    fn decode_bytes(&self, tokens: &[u32]) -> Result<Vec<u8>, DomainError> {
        Ok(self
            .bpe
            ._decode_native_and_split(tokens.to_vec())
            .flatten()
            .collect())
    }
}
