//! Object storage contract for original uploads

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Where an upload was saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Backend key (object key or relative path)
    pub key: String,
    /// Retrieval URL; presigned and time-limited for object stores
    pub url: String,
}

/// Saves original uploads and hands back a retrieval reference
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Save `bytes` under a key derived from `file_id` and `filename`
    async fn save(
        &self,
        file_id: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<StoredObject, DomainError>;
}

/// Object key for an upload: `<file_id>/<sanitized filename>`
pub fn object_key(file_id: &str, filename: &str) -> String {
    let name: String = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();

    let name = if name.is_empty() || name == "." || name == ".." {
        "upload".to_string()
    } else {
        name
    };

    format!("{}/{}", file_id, name)
}
