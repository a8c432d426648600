//! Text extractor implementations

mod docx;
mod pdf;
mod plain_text;
mod router;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use plain_text::PlainTextExtractor;
pub use router::DocumentTextExtractor;

use crate::domain::{DocumentFormat, DomainError};

/// Reject text that is empty once surrounding whitespace is removed
pub(crate) fn require_content(text: String, format: DocumentFormat) -> Result<String, DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::empty_content(format!(
            "No text extracted from {} document",
            format
        )));
    }

    Ok(text)
}

/// Error for an extractor asked to handle a format it does not own
pub(crate) fn wrong_format(extractor: &str, format: DocumentFormat) -> DomainError {
    DomainError::unsupported_format(format!("{} cannot extract {} documents", extractor, format))
}
