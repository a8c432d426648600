use std::time::Duration;

use serde::Deserialize;

use crate::domain::ingestion::{EmbeddingFailurePolicy, UploadLimits, DEFAULT_MAX_FILE_SIZE};
use crate::domain::RetryConfig;
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on request bodies; must leave room above the upload limit
    pub request_body_limit_bytes: usize,
    /// Browser origins allowed by CORS; empty disables CORS headers
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub allowed_extensions: Vec<String>,
    pub max_file_size_bytes: usize,
    pub max_tokens: usize,
    pub embedding_failure_policy: EmbeddingFailurePolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    /// Falls back to `OPENAI_API_KEY` when unset
    pub api_key: Option<String>,
    pub base_url: String,
    pub dimensions: usize,
    pub max_concurrency: usize,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreBackend {
    #[default]
    Milvus,
    InMemory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub backend: VectorStoreBackend,
    pub url: String,
    pub token: Option<String>,
    pub collection: String,
    pub dimensions: usize,
    pub max_text_length: usize,
    pub nprobe: u32,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Local,
    S3,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub upload_dir: String,
    pub public_base_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub presign_expiry_secs: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScannerBackend {
    #[default]
    Noop,
    Clamd,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub backend: ScannerBackend,
    pub clamd_address: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Incoming webhook for vector store alerts; alerts are only logged when unset
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_body_limit_bytes: DEFAULT_MAX_FILE_SIZE + 10 * 1024 * 1024,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["pdf".to_string(), "txt".to_string(), "docx".to_string()],
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
            max_tokens: 512,
            embedding_failure_policy: EmbeddingFailurePolicy::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            dimensions: 1536,
            max_concurrency: 16,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorStoreBackend::default(),
            url: "http://localhost:19530".to_string(),
            token: None,
            collection: "rag_documents".to_string(),
            dimensions: 1536,
            max_text_length: 4096,
            nprobe: 10,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            upload_dir: "uploads".to_string(),
            public_base_url: None,
            s3_bucket: None,
            s3_region: None,
            presign_expiry_secs: 3600,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            backend: ScannerBackend::default(),
            clamd_address: "127.0.0.1:3310".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: 10,
        }
    }
}

impl IngestionConfig {
    pub fn limits(&self) -> UploadLimits {
        UploadLimits::new(&self.allowed_extensions, self.max_file_size_bytes)
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl VectorStoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject combinations that would only fail at request time
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.embedding.dimensions != self.vector_store.dimensions {
            return Err(config::ConfigError::Message(format!(
                "embedding.dimensions ({}) must match vector_store.dimensions ({})",
                self.embedding.dimensions, self.vector_store.dimensions
            )));
        }

        if self.ingestion.max_tokens == 0 {
            return Err(config::ConfigError::Message(
                "ingestion.max_tokens must be greater than zero".to_string(),
            ));
        }

        if self.storage.backend == StorageBackend::S3 && self.storage.s3_bucket.is_none() {
            return Err(config::ConfigError::Message(
                "storage.s3_bucket is required for the s3 backend".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.ingestion.max_file_size_bytes, 200 * 1024 * 1024);
        assert_eq!(config.embedding.retry.max_attempts, 3);
        assert_eq!(config.vector_store.nprobe, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_toml(
            r#"
            [vector_store]
            backend = "in_memory"

            [ingestion]
            embedding_failure_policy = "skip_failed"
            max_tokens = 256

            [embedding.retry]
            backoff_ms = 100
            "#,
        );

        assert_eq!(config.vector_store.backend, VectorStoreBackend::InMemory);
        assert_eq!(config.vector_store.collection, "rag_documents");
        assert_eq!(config.ingestion.embedding_failure_policy, EmbeddingFailurePolicy::SkipFailed);
        assert_eq!(config.ingestion.max_tokens, 256);
        assert_eq!(config.embedding.retry.backoff_ms, 100);
        assert_eq!(config.embedding.retry.max_attempts, 3);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let mut config = AppConfig::default();
        config.vector_store.dimensions = 768;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_s3_requires_bucket() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::S3;
        assert!(config.validate().is_err());

        config.storage.s3_bucket = Some("uploads".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_limits_from_config() {
        let config = from_toml(
            r#"
            [ingestion]
            allowed_extensions = ["PDF", ".txt"]
            max_file_size_bytes = 1024
            "#,
        );

        let limits = config.ingestion.limits();
        assert!(limits.allows("pdf"));
        assert!(limits.allows("txt"));
        assert!(!limits.allows("docx"));
        assert_eq!(limits.max_size_bytes(), 1024);
    }
}
