//! Retrying front for a vector store backend

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, error, instrument, warn};

use crate::domain::vector_store::{
    AdminAlert, AdminNotifier, CollectionSchema, SearchHit, VectorRecord, VectorStore,
};
use crate::domain::{DomainError, RetryConfig, StoreOperation};
use crate::infrastructure::observability::{record_vector_store_failure, record_vector_store_request};

/// Knobs for the gateway
#[derive(Debug, Clone)]
pub struct VectorStoreSettings {
    pub schema: CollectionSchema,
    pub nprobe: u32,
    pub retry: RetryConfig,
    pub timeout: Duration,
}

impl VectorStoreSettings {
    pub fn new(schema: CollectionSchema) -> Self {
        Self {
            schema,
            nprobe: 10,
            retry: RetryConfig::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_nprobe(mut self, nprobe: u32) -> Self {
        self.nprobe = nprobe;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Wraps a [`VectorStore`] with lazy collection setup, retries and alerting
///
/// The collection is ensured on first use. A failed ensure is not cached, so
/// the next attempt tries again. When an operation runs out of attempts the
/// notifier is called exactly once before the error is returned.
#[derive(Debug)]
pub struct VectorStoreGateway {
    store: Arc<dyn VectorStore>,
    notifier: Arc<dyn AdminNotifier>,
    settings: VectorStoreSettings,
    ensured: OnceCell<()>,
}

impl VectorStoreGateway {
    pub fn new(
        store: Arc<dyn VectorStore>,
        notifier: Arc<dyn AdminNotifier>,
        settings: VectorStoreSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            settings,
            ensured: OnceCell::new(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn schema(&self) -> &CollectionSchema {
        &self.settings.schema
    }

    /// Whether the collection has been ensured in this process
    pub fn is_ready(&self) -> bool {
        self.ensured.initialized()
    }

    /// Store records and return their ids in input order
    #[instrument(skip(self, records), fields(backend = self.backend_name(), count = records.len()))]
    pub async fn insert(&self, records: Vec<VectorRecord>) -> Result<Vec<String>, DomainError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<VectorRecord> = records
            .into_iter()
            .map(|record| self.fit_text(record))
            .collect();

        let ids = self
            .run(StoreOperation::Insert, || {
                self.store.insert(&self.settings.schema, &records)
            })
            .await?;

        debug!(inserted = ids.len(), "Stored vectors");
        Ok(ids)
    }

    /// Nearest neighbours of `vector`, closest first
    #[instrument(skip(self, vector), fields(backend = self.backend_name()))]
    pub async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>, DomainError> {
        self.run(StoreOperation::Search, || {
            self.store
                .search(&self.settings.schema, vector, limit, self.settings.nprobe)
        })
        .await
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, String> {
        match tokio::time::timeout(self.settings.timeout, call).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(_) => Err(format!("timed out after {:?}", self.settings.timeout)),
        }
    }

    async fn ensure_collection(&self) -> Result<(), String> {
        self.ensured
            .get_or_try_init(|| self.timed(self.store.ensure_collection(&self.settings.schema)))
            .await
            .map(|_| ())
    }

    async fn run<T, F, Fut>(&self, operation: StoreOperation, mut call: F) -> Result<T, DomainError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let attempts = self.settings.retry.attempts();
        let backend = self.backend_name();
        let mut failed = operation;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            let result = match self.ensure_collection().await {
                Ok(()) => self.timed(call()).await.map_err(|e| (operation, e)),
                Err(e) => Err((StoreOperation::EnsureCollection, e)),
            };

            match result {
                Ok(value) => {
                    record_vector_store_request(backend, operation, true);
                    return Ok(value);
                }
                Err((op, e)) => {
                    record_vector_store_request(backend, op, false);
                    error!(attempt, attempts, operation = %op, error = %e, "Vector store attempt failed");
                    failed = op;
                    last_error = e;
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.settings.retry.delay_after_attempt(attempt)).await;
            }
        }

        record_vector_store_failure(backend, failed);
        let alert = AdminAlert::new(failed, backend, attempts, last_error.clone());
        self.notifier.notify(&alert).await;

        Err(DomainError::vector_store(failed, attempts, last_error))
    }

    fn fit_text(&self, mut record: VectorRecord) -> VectorRecord {
        let max = self.settings.schema.max_text_length;

        if record.text.len() > max {
            warn!(max_bytes = max, "Truncating chunk text to fit the collection");
            record.text.truncate(floor_char_boundary(&record.text, max));
        }

        record
    }
}

/// Largest char boundary at or below `index`
fn floor_char_boundary(text: &str, index: usize) -> usize {
    text.char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= index)
        .last()
        .unwrap_or(0)
}
