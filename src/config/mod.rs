//! Application configuration

mod app_config;

pub use app_config::{
    AlertsConfig, AppConfig, EmbeddingConfig, IngestionConfig, LogFormat, LoggingConfig,
    ScannerBackend, ScannerConfig, ServerConfig, StorageBackend, StorageConfig,
    VectorStoreBackend, VectorStoreConfig,
};
