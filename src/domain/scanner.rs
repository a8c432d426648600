//! Virus scanning contract

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Result of scanning an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanVerdict {
    Clean,
    Infected { signature: String },
}

impl ScanVerdict {
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }
}

/// Scans raw bytes before anything else touches them
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VirusScanner: Send + Sync {
    /// Scanner name for logs
    fn name(&self) -> &'static str;

    /// Scan the bytes of one upload
    ///
    /// An `Err` means the scanner itself failed; an infected file is
    /// `Ok(ScanVerdict::Infected)`.
    async fn scan(&self, bytes: &[u8], filename: &str) -> Result<ScanVerdict, DomainError>;
}
