//! RAG document search
//!
//! Ingests PDF, plain text and Word uploads into a vector index and answers
//! natural-language queries with the closest passages:
//! - Text extraction and token-window chunking
//! - Retrying, concurrent embedding with per-chunk failure isolation
//! - Milvus or in-memory vector storage with admin alerting
//! - Single-shot and streaming (SSE) ingestion

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use api::state::AppState;
use config::{ScannerBackend, StorageBackend, VectorStoreBackend};
use domain::vector_store::{AdminNotifier, CollectionSchema, VectorStore};
use domain::{BlobStorage, TokenChunker, VirusScanner};
use infrastructure::blob_storage::{LocalBlobStorage, S3BlobStorage};
use infrastructure::embedding::{EmbeddingGenerator, OpenAiEmbeddingProvider};
use infrastructure::extraction::DocumentTextExtractor;
use infrastructure::http_client::HttpClient;
use infrastructure::scanner::{ClamdScanner, NoopVirusScanner};
use infrastructure::services::{
    IngestionService, IngestionServiceDeps, IngestionSettings, RetrievalService,
};
use infrastructure::tokenizer::TiktokenTokenizer;
use infrastructure::vector_store::{
    InMemoryVectorStore, LogAdminNotifier, MilvusVectorStore, VectorStoreGateway,
    VectorStoreSettings, WebhookAdminNotifier,
};

/// Fully wired services, shared by the HTTP server and the CLI commands
#[derive(Debug, Clone)]
pub struct Services {
    pub ingestion: IngestionService,
    pub retrieval: RetrievalService,
}

/// Create the application state with configuration from files and environment
pub async fn create_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    create_app_state_with_config(&config).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let services = create_services(config).await?;

    Ok(AppState::new(
        Arc::new(services.ingestion),
        Arc::new(services.retrieval),
    ))
}

/// Build every collaborator from configuration and wire the services
pub async fn create_services(config: &AppConfig) -> anyhow::Result<Services> {
    config.validate()?;

    let embeddings = create_embedding_generator(config)?;
    let vectors = Arc::new(VectorStoreGateway::new(
        create_vector_store(config)?,
        create_admin_notifier(config)?,
        VectorStoreSettings::new(CollectionSchema::new(
            config.vector_store.collection.clone(),
            config.vector_store.dimensions,
            config.vector_store.max_text_length,
        ))
        .with_nprobe(config.vector_store.nprobe)
        .with_retry(config.vector_store.retry.clone())
        .with_timeout(config.vector_store.timeout()),
    ));

    let ingestion = IngestionService::new(IngestionServiceDeps {
        scanner: create_scanner(config),
        extractor: Arc::new(DocumentTextExtractor::default()),
        chunker: create_chunker(&config.embedding.model),
        embeddings: embeddings.clone(),
        vectors: Arc::clone(&vectors),
        storage: create_blob_storage(config).await?,
    })
    .with_settings(IngestionSettings {
        limits: config.ingestion.limits(),
        max_tokens: config.ingestion.max_tokens,
        failure_policy: config.ingestion.embedding_failure_policy,
    });

    let retrieval = RetrievalService::new(embeddings, vectors);

    info!(
        vector_store = retrieval.status().vector_store,
        collection = %config.vector_store.collection,
        storage = ?config.storage.backend,
        scanner = ?config.scanner.backend,
        failure_policy = ?config.ingestion.embedding_failure_policy,
        "Services initialized"
    );

    Ok(Services {
        ingestion,
        retrieval,
    })
}

fn create_embedding_generator(config: &AppConfig) -> anyhow::Result<EmbeddingGenerator> {
    let embedding = &config.embedding;

    if embedding.provider != "openai" {
        anyhow::bail!("Unsupported embedding provider: {}", embedding.provider);
    }

    let api_key = embedding
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .context("OPENAI_API_KEY environment variable or embedding.api_key is required")?;

    let provider = OpenAiEmbeddingProvider::with_base_url(
        HttpClient::new(),
        api_key,
        embedding.base_url.clone(),
    );

    Ok(EmbeddingGenerator::new(Arc::new(provider), embedding.model.clone())
        .with_dimensions(embedding.dimensions)
        .with_retry(embedding.retry.clone())
        .with_timeout(embedding.timeout())
        .with_max_concurrency(embedding.max_concurrency))
}

fn create_chunker(model: &str) -> TokenChunker {
    match TiktokenTokenizer::for_model(model) {
        Ok(tokenizer) => TokenChunker::new(Arc::new(tokenizer)),
        Err(e) => {
            warn!(model, error = %e, "No tokenizer available; uploads will fail at chunking");
            TokenChunker::unavailable()
        }
    }
}

fn create_vector_store(config: &AppConfig) -> anyhow::Result<Arc<dyn VectorStore>> {
    let settings = &config.vector_store;

    match settings.backend {
        VectorStoreBackend::Milvus => {
            // Per-attempt timeouts are enforced by the gateway
            let client = HttpClient::with_timeout(settings.timeout() + Duration::from_secs(5))?;
            let store = MilvusVectorStore::new(client, settings.url.clone());

            Ok(match &settings.token {
                Some(token) => Arc::new(store.with_token(token.clone())),
                None => Arc::new(store),
            })
        }
        VectorStoreBackend::InMemory => {
            warn!("Using the in-memory vector store; indexed documents are lost on restart");
            Ok(Arc::new(InMemoryVectorStore::new()))
        }
    }
}

fn create_admin_notifier(config: &AppConfig) -> anyhow::Result<Arc<dyn AdminNotifier>> {
    let alerts = &config.alerts;

    match &alerts.webhook_url {
        Some(url) => {
            let timeout = Duration::from_secs(alerts.timeout_secs);
            let notifier = WebhookAdminNotifier::new(HttpClient::with_timeout(timeout)?, url.clone())
                .with_timeout(timeout);
            Ok(Arc::new(notifier))
        }
        None => Ok(Arc::new(LogAdminNotifier::new())),
    }
}

fn create_scanner(config: &AppConfig) -> Arc<dyn VirusScanner> {
    match config.scanner.backend {
        ScannerBackend::Noop => Arc::new(NoopVirusScanner::new()),
        ScannerBackend::Clamd => Arc::new(
            ClamdScanner::new(config.scanner.clamd_address.clone())
                .with_timeout(Duration::from_secs(config.scanner.timeout_secs)),
        ),
    }
}

async fn create_blob_storage(config: &AppConfig) -> anyhow::Result<Arc<dyn BlobStorage>> {
    let storage = &config.storage;

    match storage.backend {
        StorageBackend::Local => {
            let local = LocalBlobStorage::new(PathBuf::from(&storage.upload_dir));

            Ok(match &storage.public_base_url {
                Some(base) => Arc::new(local.with_public_base_url(base.clone())),
                None => Arc::new(local),
            })
        }
        StorageBackend::S3 => {
            let bucket = storage
                .s3_bucket
                .clone()
                .context("storage.s3_bucket is required for the s3 backend")?;

            let s3 = S3BlobStorage::new(bucket, storage.s3_region.clone())
                .await
                .with_presign_expiry(Duration::from_secs(storage.presign_expiry_secs));

            Ok(Arc::new(s3))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.embedding.api_key = Some("sk-test".to_string());
        config.vector_store.backend = VectorStoreBackend::InMemory;
        config
    }

    #[tokio::test]
    async fn test_create_services_in_memory() {
        let services = create_services(&in_memory_config()).await.unwrap();

        let status = services.retrieval.status();
        assert_eq!(status.vector_store, "in_memory");
        assert_eq!(status.collection, "rag_documents");
        assert_eq!(status.embedding_provider, "openai");
        assert_eq!(services.ingestion.settings().max_tokens, 512);
    }

    #[tokio::test]
    async fn test_unknown_embedding_provider_is_rejected() {
        let mut config = in_memory_config();
        config.embedding.provider = "cohere".to_string();

        assert!(create_services(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut config = in_memory_config();
        config.embedding.dimensions = 3072;

        assert!(create_services(&config).await.is_err());
    }

    #[test]
    fn test_unknown_model_still_gets_a_tokenizer() {
        let chunker = create_chunker("some-future-model");
        assert!(chunker.tokenizer_name().is_some());
    }
}
