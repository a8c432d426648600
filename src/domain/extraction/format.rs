//! Supported document formats

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A document format the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Txt,
    Docx,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 3] = [Self::Pdf, Self::Txt, Self::Docx];

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Docx => "docx",
        }
    }

    /// Resolve a format from an extension, ignoring case and a leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();

        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Resolve a format from a filename's final extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        extension_of(filename).and_then(Self::from_extension)
    }
}

/// The final extension of a filename, without the dot
pub fn extension_of(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;

    if stem.is_empty() || ext.is_empty() {
        return None;
    }

    Some(ext)
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DocumentFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
            .ok_or_else(|| DomainError::unsupported_format(format!("Unsupported format: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ParseErrorKind;

    #[test]
    fn test_from_extension_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension(".Docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_extension("txt"), Some(DocumentFormat::Txt));
        assert_eq!(DocumentFormat::from_extension("exe"), None);
    }

    #[test]
    fn test_from_filename_uses_last_extension() {
        assert_eq!(
            DocumentFormat::from_filename("report.final.PDF"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(DocumentFormat::from_filename("notes.txt.exe"), None);
        assert_eq!(DocumentFormat::from_filename("README"), None);
        assert_eq!(DocumentFormat::from_filename(".txt"), None);
    }

    #[test]
    fn test_from_str_reports_unsupported_format() {
        let err = "rtf".parse::<DocumentFormat>().unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnsupportedFormat));
    }
}
