//! Text extractor trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::DocumentFormat;
use crate::domain::DomainError;

/// Turns raw document bytes into plain text
///
/// Implementations are deterministic: the same bytes always yield the same
/// text. A successful result is never empty or whitespace-only.
#[async_trait]
pub trait TextExtractor: Send + Sync + Debug {
    /// Extract text from the given bytes
    async fn extract(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, DomainError>;

    /// Formats this extractor can handle
    fn supported_formats(&self) -> Vec<DocumentFormat>;

    /// Check whether a format is supported
    fn supports(&self, format: DocumentFormat) -> bool {
        self.supported_formats().contains(&format)
    }
}
