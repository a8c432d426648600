use std::fmt;

use thiserror::Error;

/// Why a document could not be turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnsupportedFormat,
    EmptyContent,
    MalformedInput,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat => write!(f, "unsupported format"),
            Self::EmptyContent => write!(f, "empty content"),
            Self::MalformedInput => write!(f, "malformed input"),
        }
    }
}

/// Why a text could not be split into token windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkingErrorKind {
    TokenizerUnavailable,
}

impl fmt::Display for ChunkingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenizerUnavailable => write!(f, "tokenizer unavailable"),
        }
    }
}

/// Vector store operation that exhausted its attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    EnsureCollection,
    Insert,
    Search,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnsureCollection => write!(f, "ensure_collection"),
            Self::Insert => write!(f, "insert"),
            Self::Search => write!(f, "search"),
        }
    }
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Parse error ({kind}): {message}")]
    Parse {
        kind: ParseErrorKind,
        message: String,
    },

    #[error("Chunking error ({kind}): {message}")]
    Chunking {
        kind: ChunkingErrorKind,
        message: String,
    },

    #[error("Embedding error after {attempts} attempt(s): {message}")]
    Embedding { attempts: u32, message: String },

    #[error("Vector store {operation} failed after {attempts} attempt(s): {message}")]
    VectorStore {
        operation: StoreOperation,
        attempts: u32,
        message: String,
    },

    #[error("Virus scan error: {message}")]
    Scan { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// User-facing error category
///
/// Internal details stay in logs; clients only ever see the category message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Parse,
    Chunking,
    Embedding,
    VectorStore,
    Scan,
    Storage,
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::Parse => "parse_error",
            Self::Chunking => "chunking_error",
            Self::Embedding => "embedding_error",
            Self::VectorStore => "vector_store_error",
            Self::Scan => "scan_error",
            Self::Storage => "storage_error",
            Self::Internal => "internal_error",
        }
    }

    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation | Self::Parse)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn parse(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            message: message.into(),
        }
    }

    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::parse(ParseErrorKind::UnsupportedFormat, message)
    }

    pub fn empty_content(message: impl Into<String>) -> Self {
        Self::parse(ParseErrorKind::EmptyContent, message)
    }

    pub fn malformed_input(message: impl Into<String>) -> Self {
        Self::parse(ParseErrorKind::MalformedInput, message)
    }

    pub fn chunking(kind: ChunkingErrorKind, message: impl Into<String>) -> Self {
        Self::Chunking {
            kind,
            message: message.into(),
        }
    }

    pub fn tokenizer_unavailable(message: impl Into<String>) -> Self {
        Self::chunking(ChunkingErrorKind::TokenizerUnavailable, message)
    }

    pub fn embedding(attempts: u32, message: impl Into<String>) -> Self {
        Self::Embedding {
            attempts,
            message: message.into(),
        }
    }

    pub fn vector_store(
        operation: StoreOperation,
        attempts: u32,
        message: impl Into<String>,
    ) -> Self {
        Self::VectorStore {
            operation,
            attempts,
            message: message.into(),
        }
    }

    pub fn scan(message: impl Into<String>) -> Self {
        Self::Scan {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Category exposed to clients
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Parse { .. } => ErrorCategory::Parse,
            Self::Chunking { .. } => ErrorCategory::Chunking,
            Self::Embedding { .. } => ErrorCategory::Embedding,
            Self::VectorStore { .. } => ErrorCategory::VectorStore,
            Self::Scan { .. } => ErrorCategory::Scan,
            Self::Storage { .. } => ErrorCategory::Storage,
            Self::Provider { .. } | Self::Configuration { .. } | Self::Internal { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    /// Message safe to return to a client
    ///
    /// Validation messages describe the caller's own input and are passed
    /// through. Everything else is replaced by a fixed per-category text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Parse { kind, .. } => match kind {
                ParseErrorKind::UnsupportedFormat => "Unsupported file format".to_string(),
                ParseErrorKind::EmptyContent => "No text could be extracted from the document".to_string(),
                ParseErrorKind::MalformedInput => "The document could not be read".to_string(),
            },
            Self::Chunking { .. } => "Failed to split document text".to_string(),
            Self::Embedding { .. } => "Failed to generate embeddings".to_string(),
            Self::VectorStore { .. } => "Vector database is unavailable".to_string(),
            Self::Scan { .. } => "Virus scan failed".to_string(),
            Self::Storage { .. } => "Failed to store the uploaded file".to_string(),
            Self::Provider { .. } | Self::Configuration { .. } | Self::Internal { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    /// Parse error kind, if this is a parse error
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Self::Parse { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.user_message(), "Invalid input");
    }

    #[test]
    fn test_parse_error_display() {
        let error = DomainError::empty_content("pdf produced no text");
        assert_eq!(
            error.to_string(),
            "Parse error (empty content): pdf produced no text"
        );
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::EmptyContent));
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let error = DomainError::vector_store(
            StoreOperation::Insert,
            3,
            "connection refused 10.0.0.7:19530",
        );

        assert_eq!(error.category(), ErrorCategory::VectorStore);
        assert!(!error.user_message().contains("10.0.0.7"));
        assert!(error.to_string().contains("after 3 attempt(s)"));
    }

    #[test]
    fn test_provider_errors_are_internal() {
        let error = DomainError::provider("openai", "HTTP 401: bad key");
        assert_eq!(error.category(), ErrorCategory::Internal);
        assert!(!error.category().is_client_error());
    }

    #[test]
    fn test_client_error_categories() {
        assert!(ErrorCategory::Validation.is_client_error());
        assert!(ErrorCategory::Parse.is_client_error());
        assert!(!ErrorCategory::Embedding.is_client_error());
        assert_eq!(ErrorCategory::Scan.as_str(), "scan_error");
    }
}
