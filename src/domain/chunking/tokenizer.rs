//! Tokenizer capability

use std::fmt::Debug;

use crate::domain::DomainError;

/// Unicode replacement character used when a token window splits a character
pub const REPLACEMENT: char = '\u{FFFD}';

/// A tokenizer bound to one encoding
pub trait Tokenizer: Send + Sync + Debug {
    /// Encoding name (e.g. `cl100k_base`)
    fn name(&self) -> &str;

    /// Encode text into token ids
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Raw bytes of the given ids, which must have come from `encode`
    fn decode_bytes(&self, tokens: &[u32]) -> Result<Vec<u8>, DomainError>;

    /// Decode token ids; fails when the ids do not form valid UTF-8
    fn decode(&self, tokens: &[u32]) -> Result<String, DomainError> {
        String::from_utf8(self.decode_bytes(tokens)?)
            .map_err(|e| DomainError::internal(format!("Token window is not valid UTF-8: {}", e)))
    }
}

/// Decode a token window, tolerating characters split at either edge
///
/// Byte-level encodings can cut a multi-byte character in half at a window
/// boundary. Each invalid byte sequence becomes one U+FFFD; every complete
/// character in the window is kept.
pub fn decode_lossy(tokenizer: &dyn Tokenizer, tokens: &[u32]) -> String {
    match tokenizer.decode_bytes(tokens) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => REPLACEMENT.to_string(),
    }
}
