//! Retrying embedding generator with concurrent per-chunk fan-out

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

use crate::domain::embedding::{
    EmbeddedChunk, EmbeddingBatch, EmbeddingProvider, EmbeddingRequest,
};
use crate::domain::{Chunk, DomainError, RetryConfig};
use crate::infrastructure::observability::record_embedding_attempt;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Turns texts into vectors through an [`EmbeddingProvider`]
///
/// Each text gets up to `retry.max_attempts` tries with linear backoff and a
/// per-attempt timeout.
#[derive(Debug, Clone)]
pub struct EmbeddingGenerator {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
    dimensions: Option<usize>,
    retry: RetryConfig,
    timeout: Duration,
    max_concurrency: usize,
}

impl EmbeddingGenerator {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            dimensions: None,
            retry: RetryConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Request a specific output size from models that support it
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Attempts made per text before giving up
    pub fn max_attempts(&self) -> u32 {
        self.retry.attempts()
    }

    fn request(&self, text: &str) -> EmbeddingRequest {
        let request = EmbeddingRequest::new(self.model.clone(), text);

        match self.dimensions {
            Some(dims) => request.with_dimensions(dims),
            None => request,
        }
    }

    async fn attempt(&self, text: &str) -> Result<Vec<f32>, String> {
        let call = self.provider.embed(self.request(text));

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => response.into_vector(self.dimensions),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {:?}", self.timeout)),
        }
    }

    /// Embed one text, retrying on failure
    ///
    /// Fails with an embedding error carrying the last underlying error once
    /// every attempt has failed.
    #[instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let attempts = self.retry.attempts();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.attempt(text).await {
                Ok(vector) => {
                    record_embedding_attempt(true);
                    return Ok(vector);
                }
                Err(e) => {
                    record_embedding_attempt(false);
                    warn!(attempt, attempts, error = %e, "Embedding attempt failed");
                    last_error = e;
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.retry.delay_after_attempt(attempt)).await;
            }
        }

        Err(DomainError::embedding(attempts, last_error))
    }

    /// Embed every chunk concurrently
    ///
    /// Never fails as a whole: a chunk whose retries are exhausted carries its
    /// error instead of a vector. Output order matches input order regardless
    /// of completion order.
    pub async fn embed_many(&self, chunks: Vec<Chunk>) -> EmbeddingBatch {
        let total = chunks.len();

        let embedded: Vec<EmbeddedChunk> = stream::iter(chunks)
            .map(|chunk| async move {
                match self.embed_one(&chunk.text).await {
                    Ok(vector) => EmbeddedChunk::embedded(chunk, vector),
                    Err(e) => EmbeddedChunk::failed(chunk, e.to_string()),
                }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let batch = EmbeddingBatch::new(embedded);
        debug!(total, failed = batch.failure_count(), "Embedded chunks");

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(i, i * 10, i * 10 + 10, *t))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let provider = Arc::new(MockEmbeddingProvider::new(4).failing_first(2));
        let generator = EmbeddingGenerator::new(provider.clone(), "m");

        let started = tokio::time::Instant::now();
        let vector = generator.embed_one("hello").await.unwrap();

        assert_eq!(vector, provider.vector_for("hello"));
        assert_eq!(provider.calls(), 3);
        // 0.5s after attempt 1, 1.0s after attempt 2
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(1500));
        assert!(waited < Duration::from_millis(1600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_report_last_error() {
        let provider = Arc::new(MockEmbeddingProvider::new(4).failing_on("bad"));
        let generator = EmbeddingGenerator::new(provider.clone(), "m");

        let err = generator.embed_one("bad input").await.unwrap_err();

        assert_eq!(provider.calls(), 3);
        match err {
            DomainError::Embedding { attempts, message } => {
                assert_eq!(attempts, 3);
                assert!(message.contains("rejected input"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let provider = Arc::new(
            MockEmbeddingProvider::new(4).delaying("slow", Duration::from_secs(60)),
        );
        let generator = EmbeddingGenerator::new(provider.clone(), "m")
            .with_retry(RetryConfig::new(2).with_backoff_ms(10))
            .with_timeout(Duration::from_secs(1));

        let err = generator.embed_one("slow text").await.unwrap_err();

        assert!(err.to_string().contains("timed out"));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_embed_many_isolates_failures() {
        let provider = Arc::new(MockEmbeddingProvider::new(4).failing_on("poison"));
        let generator = EmbeddingGenerator::new(provider, "m");

        let batch = generator
            .embed_many(chunks(&["alpha", "beta", "poison", "delta", "epsilon"]))
            .await;

        assert_eq!(batch.len(), 5);
        assert_eq!(batch.failure_count(), 1);

        let chunks = batch.chunks();
        assert!(chunks[2].error().is_some());
        for i in [0, 1, 3, 4] {
            assert!(chunks[i].is_embedded(), "chunk {} should have a vector", i);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_embed_many_preserves_order() {
        let provider = Arc::new(
            MockEmbeddingProvider::new(4)
                .delaying("first", Duration::from_millis(300))
                .delaying("second", Duration::from_millis(100)),
        );
        let generator = EmbeddingGenerator::new(provider.clone(), "m");

        let batch = generator
            .embed_many(chunks(&["first", "second", "third"]))
            .await;

        let indices: Vec<usize> = batch.chunks().iter().map(|c| c.chunk.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(batch.chunks()[0].vector().unwrap(), provider.vector_for("first"));
        assert_eq!(batch.chunks()[2].vector().unwrap(), provider.vector_for("third"));
    }

    #[tokio::test]
    async fn test_embed_many_empty() {
        let generator = EmbeddingGenerator::new(Arc::new(MockEmbeddingProvider::new(4)), "m");
        let batch = generator.embed_many(Vec::new()).await;

        assert!(batch.is_empty());
    }
}
