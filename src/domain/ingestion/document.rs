//! Raw uploaded document

use bytes::Bytes;

use crate::domain::extraction::extension_of;

/// An uploaded file as received, owned by a single ingestion call
#[derive(Debug, Clone)]
pub struct RawDocument {
    bytes: Bytes,
    filename: String,
    extension: String,
}

impl RawDocument {
    /// Create a document; the extension is taken from the filename, lowercased
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let filename = filename.into();
        let extension = extension_of(&filename)
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        Self {
            bytes: bytes.into(),
            filename,
            extension,
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Lowercased extension without the dot; empty if the filename has none
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
