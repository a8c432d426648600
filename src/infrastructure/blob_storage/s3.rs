//! S3 blob storage with presigned download URLs

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::{debug, instrument};

use crate::domain::blob_storage::{object_key, BlobStorage, StoredObject};
use crate::domain::DomainError;

/// Saves uploads to an S3 bucket
///
/// The returned URL is a presigned GET, valid for `presign_expiry`.
#[derive(Debug, Clone)]
pub struct S3BlobStorage {
    client: S3Client,
    bucket: String,
    presign_expiry: Duration,
}

impl S3BlobStorage {
    /// Create a client from the default AWS credential chain
    pub async fn new(bucket: impl Into<String>, region: Option<String>) -> Self {
        let aws_config = if let Some(region) = region {
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(region))
                .load()
                .await
        } else {
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .load()
                .await
        };

        Self::from_client(S3Client::new(&aws_config), bucket)
    }

    /// Create with an existing client
    pub fn from_client(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            presign_expiry: Duration::from_secs(3600),
        }
    }

    pub fn with_presign_expiry(mut self, expiry: Duration) -> Self {
        self.presign_expiry = expiry;
        self
    }

    async fn presigned_url(&self, key: &str) -> Result<String, DomainError> {
        let presigning = PresigningConfig::expires_in(self.presign_expiry)
            .map_err(|e| DomainError::configuration(format!("Invalid presign expiry: {}", e)))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to presign {}: {}", key, DisplayErrorContext(&e)))
            })?;

        Ok(request.uri().to_string())
    }
}

#[async_trait]
impl BlobStorage for S3BlobStorage {
    fn name(&self) -> &'static str {
        "s3"
    }

    #[instrument(skip(self, bytes), fields(bucket = %self.bucket, size = bytes.len()))]
    async fn save(
        &self,
        file_id: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<StoredObject, DomainError> {
        let key = object_key(file_id, filename);
        let content_type = mime_guess::from_path(filename).first_or_octet_stream();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type.essence_str())
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to upload s3://{}/{}: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(key = %key, "Uploaded to S3");

        let url = self.presigned_url(&key).await?;

        Ok(StoredObject { key, url })
    }
}
