//! Upload validation, applied before any pipeline work

use crate::domain::extraction::DocumentFormat;
use crate::domain::DomainError;

/// 200 MiB
pub const DEFAULT_MAX_FILE_SIZE: usize = 200 * 1024 * 1024;

/// Upload acceptance limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    /// Lowercased extensions without dots
    allowed_extensions: Vec<String>,
    max_size_bytes: usize,
}

impl UploadLimits {
    pub fn new<I, S>(allowed_extensions: I, max_size_bytes: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            max_size_bytes,
        }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    pub fn allows(&self, extension: &str) -> bool {
        let extension = extension.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|e| *e == extension)
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::new(
            DocumentFormat::ALL.iter().map(|f| f.extension()),
            DEFAULT_MAX_FILE_SIZE,
        )
    }
}

/// Check a filename, its extension and the upload size against the limits
pub fn validate_upload(
    filename: &str,
    extension: &str,
    size: usize,
    limits: &UploadLimits,
) -> Result<(), DomainError> {
    if filename.trim().is_empty() {
        return Err(DomainError::validation("No file was attached"));
    }

    if !limits.allows(extension) {
        return Err(DomainError::validation(format!(
            "Unsupported file type. Allowed: {}",
            limits.allowed_extensions().join(", ")
        )));
    }

    if size > limits.max_size_bytes() {
        return Err(DomainError::validation(format!(
            "File size cannot exceed {} MiB",
            limits.max_size_bytes() / (1024 * 1024)
        )));
    }

    Ok(())
}
