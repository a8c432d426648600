//! PDF extractor

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{require_content, wrong_format};
use crate::domain::{DocumentFormat, DomainError, TextExtractor};

/// Extracts text from PDFs page by page
///
/// Pages are joined with a newline. Decoding runs on the blocking pool; a
/// decoder panic is reported as malformed input.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, String> {
    pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| e.to_string())
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, DomainError> {
        if format != DocumentFormat::Pdf {
            return Err(wrong_format("PdfExtractor", format));
        }

        let owned = bytes.to_vec();
        let pages = tokio::task::spawn_blocking(move || extract_pages(&owned))
            .await
            .map_err(|e| {
                warn!(error = %e, "PDF decoder task failed");
                DomainError::malformed_input(format!("PDF decoder aborted: {}", e))
            })?
            .map_err(|e| DomainError::malformed_input(format!("PDF extraction failed: {}", e)))?;

        debug!(pages = pages.len(), "Extracted PDF pages");

        require_content(pages.join("\n"), format)
    }

    fn supported_formats(&self) -> Vec<DocumentFormat> {
        vec![DocumentFormat::Pdf]
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Build an uncompressed PDF with one Helvetica text line per page
    ///
    /// An empty entry produces a page with an empty content stream.
    pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            String::new(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut kids = Vec::with_capacity(pages.len());
        for text in pages {
            let page_id = objects.len() + 1;
            kids.push(format!("{} 0 R", page_id));
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                page_id + 1
            ));

            let content = if text.is_empty() {
                String::new()
            } else {
                format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", text)
            };
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ));
        }
        objects[1] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        );

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref = out.len();
        out.extend_from_slice(
            format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes(),
        );
        for offset in offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref
            )
            .as_bytes(),
        );

        out
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;
    use crate::domain::ParseErrorKind;

    #[tokio::test]
    async fn test_pages_joined_by_newline() {
        let bytes = pdf_with_pages(&["Alpha", "Bravo"]);

        let text = PdfExtractor::new()
            .extract(&bytes, DocumentFormat::Pdf)
            .await
            .unwrap();

        let first = text.find("Alpha").unwrap();
        let second = text.find("Bravo").unwrap();
        assert!(first < second);
        assert!(text[first..second].contains('\n'));
    }

    #[tokio::test]
    async fn test_single_page_text() {
        let bytes = pdf_with_pages(&["Handbook"]);

        let text = PdfExtractor::new()
            .extract(&bytes, DocumentFormat::Pdf)
            .await
            .unwrap();

        assert_eq!(text.trim(), "Handbook");
    }

    #[tokio::test]
    async fn test_pages_without_text_are_empty_content() {
        let bytes = pdf_with_pages(&["", ""]);

        let err = PdfExtractor::new()
            .extract(&bytes, DocumentFormat::Pdf)
            .await
            .unwrap_err();

        assert_eq!(err.parse_kind(), Some(ParseErrorKind::EmptyContent));
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_malformed() {
        let extractor = PdfExtractor::new();
        let err = extractor
            .extract(b"definitely not a pdf", DocumentFormat::Pdf)
            .await
            .unwrap_err();

        assert_eq!(err.parse_kind(), Some(ParseErrorKind::MalformedInput));
    }

    #[tokio::test]
    async fn test_rejects_other_formats() {
        let extractor = PdfExtractor::new();
        let err = extractor.extract(b"", DocumentFormat::Docx).await.unwrap_err();

        assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnsupportedFormat));
    }
}
