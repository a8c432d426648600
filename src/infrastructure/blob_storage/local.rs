use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::blob_storage::{object_key, BlobStorage, StoredObject};
use crate::domain::DomainError;

/// Saves uploads on the local filesystem under a root directory
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl LocalBlobStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base_url: None,
        }
    }

    /// Serve URLs as `<base>/<key>` instead of filesystem paths
    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_for(&self, key: &str, path: &Path) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base, key),
            None => path.display().to_string(),
        }
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    fn name(&self) -> &'static str {
        "local"
    }

    #[instrument(skip(self, bytes), fields(root = %self.root.display(), size = bytes.len()))]
    async fn save(
        &self,
        file_id: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<StoredObject, DomainError> {
        let key = object_key(file_id, filename);
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!(key = %key, "Saved upload");

        Ok(StoredObject {
            url: self.url_for(&key, &path),
            key,
        })
    }
}
