//! Plain text extractor with a Korean legacy encoding fallback

use async_trait::async_trait;
use encoding_rs::EUC_KR;
use tracing::debug;

use super::{require_content, wrong_format};
use crate::domain::{DocumentFormat, DomainError, TextExtractor};

/// Decodes `.txt` uploads as UTF-8, falling back to CP949
///
/// `encoding_rs::EUC_KR` implements the WHATWG `euc-kr` decoder, which is
/// the windows-949 (CP949) superset.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn decode(bytes: &[u8]) -> Result<String, DomainError> {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return Ok(text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string());
        }

        let (text, had_errors) = EUC_KR.decode_without_bom_handling(bytes);

        if had_errors {
            return Err(DomainError::malformed_input(
                "Text is neither valid UTF-8 nor CP949",
            ));
        }

        debug!("Decoded plain text using CP949 fallback");
        Ok(text.into_owned())
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, DomainError> {
        if format != DocumentFormat::Txt {
            return Err(wrong_format("PlainTextExtractor", format));
        }

        require_content(Self::decode(bytes)?, format)
    }

    fn supported_formats(&self) -> Vec<DocumentFormat> {
        vec![DocumentFormat::Txt]
    }
}
