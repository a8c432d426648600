//! Format dispatch over the individual extractors

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{DocxExtractor, PdfExtractor, PlainTextExtractor};
use crate::domain::{DocumentFormat, DomainError, TextExtractor};

/// Routes each document to the extractor registered for its format
#[derive(Debug, Clone)]
pub struct DocumentTextExtractor {
    extractors: Vec<Arc<dyn TextExtractor>>,
}

impl DocumentTextExtractor {
    pub fn new(extractors: Vec<Arc<dyn TextExtractor>>) -> Self {
        Self { extractors }
    }

    /// Extract text given a raw extension
    ///
    /// Unknown extensions are an `UnsupportedFormat` parse error.
    pub async fn extract_by_extension(
        &self,
        bytes: &[u8],
        extension: &str,
    ) -> Result<String, DomainError> {
        let format: DocumentFormat = extension.parse()?;
        self.extract(bytes, format).await
    }

    fn extractor_for(&self, format: DocumentFormat) -> Option<&Arc<dyn TextExtractor>> {
        self.extractors.iter().find(|e| e.supports(format))
    }
}

impl Default for DocumentTextExtractor {
    fn default() -> Self {
        Self::new(vec![
            Arc::new(PdfExtractor::new()),
            Arc::new(PlainTextExtractor::new()),
            Arc::new(DocxExtractor::new()),
        ])
    }
}

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn extract(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, DomainError> {
        let extractor = self.extractor_for(format).ok_or_else(|| {
            DomainError::unsupported_format(format!("No extractor registered for {}", format))
        })?;

        let text = extractor.extract(bytes, format).await?;
        debug!(chars = text.chars().count(), "Extracted text");

        Ok(text)
    }

    fn supported_formats(&self) -> Vec<DocumentFormat> {
        self.extractors
            .iter()
            .flat_map(|e| e.supported_formats())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseErrorKind;
    use crate::infrastructure::extraction::docx::fixtures::docx_with_body;

    #[tokio::test]
    async fn test_default_supports_all_formats() {
        let extractor = DocumentTextExtractor::default();

        for format in DocumentFormat::ALL {
            assert!(extractor.supports(format));
        }
    }

    #[tokio::test]
    async fn test_dispatch_by_extension() {
        let extractor = DocumentTextExtractor::default();

        let txt = extractor.extract_by_extension(b"plain", "TXT").await.unwrap();
        assert_eq!(txt, "plain");

        let docx = docx_with_body("<w:p><w:r><w:t>word</w:t></w:r></w:p>");
        let text = extractor.extract_by_extension(&docx, "docx").await.unwrap();
        assert_eq!(text, "word");
    }

    #[tokio::test]
    async fn test_unknown_extension_is_unsupported() {
        let extractor = DocumentTextExtractor::default();
        let err = extractor.extract_by_extension(b"x", "rtf").await.unwrap_err();

        assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnsupportedFormat));
    }

    #[tokio::test]
    async fn test_missing_extractor_is_unsupported() {
        let extractor = DocumentTextExtractor::new(vec![Arc::new(PlainTextExtractor::new())]);
        let err = extractor.extract(b"x", DocumentFormat::Pdf).await.unwrap_err();

        assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnsupportedFormat));
    }

    #[tokio::test]
    async fn test_extraction_is_deterministic() {
        let extractor = DocumentTextExtractor::default();
        let bytes = "same bytes, same text".as_bytes();

        let a = extractor.extract(bytes, DocumentFormat::Txt).await.unwrap();
        let b = extractor.extract(bytes, DocumentFormat::Txt).await.unwrap();

        assert_eq!(a, b);
    }
}
