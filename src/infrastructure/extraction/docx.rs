//! Word (.docx) extractor

use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::{require_content, wrong_format};
use crate::domain::{DocumentFormat, DomainError, TextExtractor};

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from the main document part, one line per paragraph
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

fn read_document_part(bytes: &[u8]) -> Result<String, DomainError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DomainError::malformed_input(format!("Not a valid docx archive: {}", e)))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DomainError::malformed_input(format!("Missing {}: {}", DOCUMENT_PART, e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| DomainError::malformed_input(format!("Unreadable {}: {}", DOCUMENT_PART, e)))?;

    Ok(xml)
}

/// Collect `w:p` paragraphs from WordprocessingML
fn paragraphs(xml: &str) -> Result<Vec<String>, DomainError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if in_paragraph => current.push('\t'),
                b"w:br" | b"w:cr" if in_paragraph => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| DomainError::malformed_input(format!("Invalid docx text: {}", e)))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DomainError::malformed_input(format!(
                    "Invalid docx XML at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[async_trait]
impl TextExtractor for DocxExtractor {
    async fn extract(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, DomainError> {
        if format != DocumentFormat::Docx {
            return Err(wrong_format("DocxExtractor", format));
        }

        let owned = bytes.to_vec();
        let text = tokio::task::spawn_blocking(move || {
            read_document_part(&owned).and_then(|xml| paragraphs(&xml)).map(|p| p.join("\n"))
        })
        .await
        .map_err(|e| DomainError::malformed_input(format!("docx decoder aborted: {}", e)))??;

        require_content(text, format)
    }

    fn supported_formats(&self) -> Vec<DocumentFormat> {
        vec![DocumentFormat::Docx]
    }
}
