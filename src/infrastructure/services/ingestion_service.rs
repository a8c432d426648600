//! Document ingestion: scan, extract, chunk, embed, index and store an upload

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::json;
use sha2::{Digest, Sha256};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::embedding::{EmbeddedChunk, EmbeddingBatch};
use crate::domain::ingestion::{
    validate_upload, EmbeddingFailurePolicy, IngestionResult, ProgressEvent, ProgressStage,
    RawDocument, UploadLimits,
};
use crate::domain::vector_store::VectorRecord;
use crate::domain::{
    BlobStorage, DocumentFormat, DomainError, ScanVerdict, TextExtractor, TokenChunker,
    VirusScanner,
};
use crate::infrastructure::embedding::EmbeddingGenerator;
use crate::infrastructure::observability::record_ingestion;
use crate::infrastructure::vector_store::VectorStoreGateway;

const PROGRESS_BUFFER: usize = 8;

/// Tunables for ingestion
#[derive(Debug, Clone)]
pub struct IngestionSettings {
    pub limits: UploadLimits,
    pub max_tokens: usize,
    pub failure_policy: EmbeddingFailurePolicy,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            limits: UploadLimits::default(),
            max_tokens: 512,
            failure_policy: EmbeddingFailurePolicy::default(),
        }
    }
}

/// Collaborators used by the ingestion service
#[derive(Clone)]
pub struct IngestionServiceDeps {
    pub scanner: Arc<dyn VirusScanner>,
    pub extractor: Arc<dyn TextExtractor>,
    pub chunker: TokenChunker,
    pub embeddings: EmbeddingGenerator,
    pub vectors: Arc<VectorStoreGateway>,
    pub storage: Arc<dyn BlobStorage>,
}

/// Ingestion service trait for dependency injection
#[async_trait]
pub trait IngestionServiceTrait: Send + Sync + fmt::Debug {
    /// Run the whole pipeline and return everything it produced
    async fn ingest(&self, document: RawDocument) -> Result<IngestionResult, DomainError>;

    /// Run the pipeline in the background, reporting progress as it goes
    ///
    /// The stream ends after exactly one `done` or `error` event. Dropping it
    /// abandons the ingestion.
    fn ingest_with_progress(&self, document: RawDocument) -> BoxStream<'static, ProgressEvent>;

    /// Limits applied before the pipeline runs
    fn limits(&self) -> &UploadLimits;
}

/// Ingestion pipeline over injected collaborators
#[derive(Clone)]
pub struct IngestionService {
    deps: IngestionServiceDeps,
    settings: IngestionSettings,
}

impl fmt::Debug for IngestionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionService")
            .field("scanner", &self.deps.scanner.name())
            .field("storage", &self.deps.storage.name())
            .field("vector_store", &self.deps.vectors.backend_name())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Sink for stage notifications; absent in single-shot mode
type Progress<'a> = Option<&'a mpsc::Sender<ProgressEvent>>;

async fn report(progress: Progress<'_>, stage: ProgressStage) {
    if let Some(tx) = progress {
        // A closed receiver is noticed by the worker's select loop
        let _ = tx.send(ProgressEvent::stage(stage)).await;
    }
}

impl IngestionService {
    pub fn new(deps: IngestionServiceDeps) -> Self {
        Self {
            deps,
            settings: IngestionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: IngestionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &IngestionSettings {
        &self.settings
    }

    fn validate(&self, document: &RawDocument) -> Result<(), DomainError> {
        validate_upload(
            document.filename(),
            document.extension(),
            document.size(),
            &self.settings.limits,
        )
    }

    /// Single-shot ingestion
    #[instrument(skip(self, document), fields(filename = %document.filename(), size = document.size()))]
    pub async fn ingest(&self, document: RawDocument) -> Result<IngestionResult, DomainError> {
        self.validate(&document)?;

        let file_id = Uuid::new_v4().to_string();
        self.run_recorded(&document, file_id, None).await
    }

    /// Streaming ingestion with stage notifications
    pub fn ingest_with_progress(&self, document: RawDocument) -> ReceiverStream<ProgressEvent> {
        let (tx, rx) = mpsc::channel(PROGRESS_BUFFER);
        let service = self.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = tx.closed() => {
                    warn!(filename = %document.filename(), "Progress stream dropped; abandoning ingestion");
                }
                terminal = service.progress_worker(&document, &tx) => {
                    let _ = tx.send(terminal).await;
                }
            }
        });

        ReceiverStream::new(rx)
    }

    /// Everything up to the terminal event, which is returned for the caller to send
    async fn progress_worker(
        &self,
        document: &RawDocument,
        tx: &mpsc::Sender<ProgressEvent>,
    ) -> ProgressEvent {
        report(Some(tx), ProgressStage::Uploading).await;

        if let Err(e) = self.validate(document) {
            warn!(filename = %document.filename(), error = %e, "Upload rejected");
            return ProgressEvent::error(e.user_message());
        }

        let file_id = Uuid::new_v4().to_string();

        match self.run_recorded(document, file_id, Some(tx)).await {
            Ok(result) => ProgressEvent::Done {
                file_id: result.file_id,
                storage_url: result.storage_url,
            },
            Err(e) => ProgressEvent::error(e.user_message()),
        }
    }

    async fn run_recorded(
        &self,
        document: &RawDocument,
        file_id: String,
        progress: Progress<'_>,
    ) -> Result<IngestionResult, DomainError> {
        let started = Instant::now();
        let result = self.run(document, file_id, progress).await;

        match &result {
            Ok(result) => {
                record_ingestion(document.extension(), "success", result.chunks.len(), started.elapsed());
                info!(
                    file_id = %result.file_id,
                    chunks = result.chunks.len(),
                    vectors = result.vector_ids.len(),
                    embedding_failures = result.embedding_failures(),
                    "Document ingested"
                );
            }
            Err(e) => {
                record_ingestion(document.extension(), e.category().as_str(), 0, started.elapsed());

                if e.category().is_client_error() {
                    warn!(filename = %document.filename(), error = %e, "Document rejected");
                } else {
                    error!(filename = %document.filename(), error = %e, "Ingestion failed");
                }
            }
        }

        result
    }

    async fn run(
        &self,
        document: &RawDocument,
        file_id: String,
        progress: Progress<'_>,
    ) -> Result<IngestionResult, DomainError> {
        report(progress, ProgressStage::Scanning).await;
        self.scan(document).await?;

        let format: DocumentFormat = document.extension().parse()?;
        let text = self.deps.extractor.extract(document.bytes(), format).await?;

        let chunks = self.deps.chunker.chunk(&text, self.settings.max_tokens)?;
        debug!(chunks = chunks.len(), "Chunked document");

        let batch = self.deps.embeddings.embed_many(chunks).await;
        self.check_embeddings(&batch)?;

        let records = self.vector_records(&file_id, document.filename(), &batch);
        let vector_ids = self.deps.vectors.insert(records).await?;

        report(progress, ProgressStage::Saving).await;
        let stored = self
            .deps
            .storage
            .save(&file_id, document.filename(), document.bytes())
            .await?;

        Ok(IngestionResult {
            file_id,
            filename: document.filename().to_string(),
            size: document.size(),
            storage_url: stored.url,
            text,
            chunks: batch.into_chunks(),
            vector_ids,
        })
    }

    async fn scan(&self, document: &RawDocument) -> Result<(), DomainError> {
        let verdict = self
            .deps
            .scanner
            .scan(document.bytes(), document.filename())
            .await?;

        match verdict {
            ScanVerdict::Clean => Ok(()),
            ScanVerdict::Infected { signature } => {
                warn!(filename = %document.filename(), signature = %signature, "Infected upload");
                Err(DomainError::validation("The file failed the virus scan"))
            }
        }
    }

    fn check_embeddings(&self, batch: &EmbeddingBatch) -> Result<(), DomainError> {
        let failed = batch.failure_count();

        if failed == 0 {
            return Ok(());
        }

        match self.settings.failure_policy {
            EmbeddingFailurePolicy::Abort => {
                let first = batch
                    .failures()
                    .next()
                    .map(|(chunk, error)| format!("chunk {}: {}", chunk.chunk.index, error))
                    .unwrap_or_default();

                Err(DomainError::embedding(
                    self.deps.embeddings.max_attempts(),
                    format!("{} of {} chunks failed to embed; {}", failed, batch.len(), first),
                ))
            }
            EmbeddingFailurePolicy::SkipFailed if failed == batch.len() => {
                Err(DomainError::embedding(
                    self.deps.embeddings.max_attempts(),
                    format!("all {} chunks failed to embed", failed),
                ))
            }
            EmbeddingFailurePolicy::SkipFailed => {
                warn!(failed, total = batch.len(), "Skipping chunks that failed to embed");
                Ok(())
            }
        }
    }

    fn vector_records(&self, file_id: &str, filename: &str, batch: &EmbeddingBatch) -> Vec<VectorRecord> {
        batch
            .successes()
            .filter_map(|embedded| record_for(file_id, filename, embedded))
            .collect()
    }
}

fn record_for(file_id: &str, filename: &str, embedded: &EmbeddedChunk) -> Option<VectorRecord> {
    let vector = embedded.vector()?.to_vec();
    let chunk = &embedded.chunk;
    let digest = hex::encode(Sha256::digest(chunk.text.as_bytes()));

    Some(
        VectorRecord::new(vector, chunk.text.clone())
            .with_metadata("file_id", file_id)
            .with_metadata("document_title", filename)
            .with_metadata("chunk_index", chunk.index)
            .with_metadata("start_token", chunk.start_token)
            .with_metadata("end_token", chunk.end_token)
            .with_metadata("num_tokens", chunk.num_tokens)
            .with_metadata("content_sha256", json!(digest)),
    )
}

#[async_trait]
impl IngestionServiceTrait for IngestionService {
    async fn ingest(&self, document: RawDocument) -> Result<IngestionResult, DomainError> {
        IngestionService::ingest(self, document).await
    }

    fn ingest_with_progress(&self, document: RawDocument) -> BoxStream<'static, ProgressEvent> {
        Box::pin(IngestionService::ingest_with_progress(self, document))
    }

    fn limits(&self) -> &UploadLimits {
        &self.settings.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blob_storage::{MockBlobStorage, StoredObject};
    use crate::domain::chunking::ByteTokenizer;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::scanner::MockVirusScanner;
    use crate::domain::vector_store::{
        CollectionSchema, MockVectorStore, RecordingNotifier, VectorStore,
    };
    use crate::domain::{ErrorCategory, RetryConfig, StoreOperation};
    use crate::infrastructure::extraction::DocumentTextExtractor;
    use crate::infrastructure::vector_store::{InMemoryVectorStore, VectorStoreSettings};
    use futures::StreamExt as _;

    const DIMS: usize = 4;

    fn clean_scanner() -> MockVirusScanner {
        let mut scanner = MockVirusScanner::new();
        scanner.expect_name().return_const("mock");
        scanner.expect_scan().returning(|_, _| Ok(ScanVerdict::Clean));
        scanner
    }

    fn saving_storage() -> MockBlobStorage {
        let mut storage = MockBlobStorage::new();
        storage.expect_name().return_const("mock");
        storage.expect_save().returning(|file_id, filename, _| {
            Ok(StoredObject {
                key: format!("{}/{}", file_id, filename),
                url: format!("https://files.example.com/{}/{}", file_id, filename),
            })
        });
        storage
    }

    fn unused_storage() -> MockBlobStorage {
        let mut storage = MockBlobStorage::new();
        storage.expect_name().return_const("mock");
        storage.expect_save().never();
        storage
    }

    struct Harness {
        provider: Arc<MockEmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        notifier: Arc<RecordingNotifier>,
        scanner: MockVirusScanner,
        storage: MockBlobStorage,
        settings: IngestionSettings,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                provider: Arc::new(MockEmbeddingProvider::new(DIMS)),
                store: Arc::new(InMemoryVectorStore::new()),
                notifier: Arc::new(RecordingNotifier::new()),
                scanner: clean_scanner(),
                storage: saving_storage(),
                settings: IngestionSettings {
                    max_tokens: 512,
                    ..Default::default()
                },
            }
        }

        fn build(self) -> IngestionService {
            let gateway = VectorStoreGateway::new(
                self.store,
                self.notifier,
                VectorStoreSettings::new(CollectionSchema::new("docs", DIMS, 4096))
                    .with_retry(RetryConfig::new(3)),
            );

            IngestionService::new(IngestionServiceDeps {
                scanner: Arc::new(self.scanner),
                extractor: Arc::new(DocumentTextExtractor::default()),
                chunker: TokenChunker::new(Arc::new(ByteTokenizer)),
                embeddings: EmbeddingGenerator::new(self.provider, "mock-embedding"),
                vectors: Arc::new(gateway),
                storage: Arc::new(self.storage),
            })
            .with_settings(self.settings)
        }
    }

    /// Five 16-byte segments, the third one poisoned
    fn five_chunk_text() -> String {
        ["aaaaaaaaaaaaaaaa", "bbbbbbbbbbbbbbbb", "poison-ccccccccc", "dddddddddddddddd", "eeeeeeeeeeeeeeee"]
            .concat()
    }

    #[tokio::test]
    async fn test_txt_upload_is_chunked_by_token_windows() {
        let service = Harness::new().build();
        let text = "x".repeat(1500);

        let result = service
            .ingest(RawDocument::new("notes.txt", text.clone().into_bytes()))
            .await
            .unwrap();

        let spans: Vec<(usize, usize)> = result
            .chunks
            .iter()
            .map(|c| (c.chunk.start_token, c.chunk.end_token))
            .collect();

        assert_eq!(spans, vec![(0, 512), (512, 1024), (1024, 1500)]);
        assert_eq!(result.vector_ids.len(), 3);
        assert_eq!(result.text, text);
        assert_eq!(result.size, 1500);
        assert_eq!(result.filename, "notes.txt");
        assert!(Uuid::parse_str(&result.file_id).is_ok());
        assert!(result.storage_url.contains(&result.file_id));
    }

    #[tokio::test]
    async fn test_unsupported_extension_never_enters_pipeline() {
        let mut harness = Harness::new();
        let mut scanner = MockVirusScanner::new();
        scanner.expect_name().return_const("mock");
        scanner.expect_scan().never();
        harness.scanner = scanner;
        harness.storage = unused_storage();
        let provider = harness.provider.clone();
        let service = harness.build();

        let err = service
            .ingest(RawDocument::new("setup.exe", b"MZ".to_vec()))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.user_message(), "Unsupported file type. Allowed: pdf, txt, docx");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let mut harness = Harness::new();
        harness.settings.limits = UploadLimits::new(["pdf", "txt", "docx"], 10);
        harness.storage = unused_storage();
        let provider = harness.provider.clone();
        let service = harness.build();

        let err = service
            .ingest(RawDocument::new("big.TXT", vec![b'a'; 11]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_policy_fails_upload_and_stores_nothing() {
        let mut harness = Harness::new();
        harness.provider = Arc::new(MockEmbeddingProvider::new(DIMS).failing_on("poison"));
        harness.settings.max_tokens = 16;
        harness.settings.failure_policy = EmbeddingFailurePolicy::Abort;
        harness.storage = unused_storage();
        let store = Arc::new(MockVectorStore::new());
        harness.store = store.clone();
        let service = harness.build();

        let err = service
            .ingest(RawDocument::new("doc.txt", five_chunk_text().into_bytes()))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Embedding { attempts: 3, .. }));
        assert_eq!(err.user_message(), "Failed to generate embeddings");
        assert!(err.to_string().contains("1 of 5 chunks"));
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_policy_stores_successful_chunks() {
        let mut harness = Harness::new();
        harness.provider = Arc::new(MockEmbeddingProvider::new(DIMS).failing_on("poison"));
        harness.settings.max_tokens = 16;
        harness.settings.failure_policy = EmbeddingFailurePolicy::SkipFailed;
        let store = Arc::new(MockVectorStore::new());
        harness.store = store.clone();
        let service = harness.build();

        let result = service
            .ingest(RawDocument::new("doc.txt", five_chunk_text().into_bytes()))
            .await
            .unwrap();

        assert_eq!(result.chunks.len(), 5);
        assert_eq!(result.embedding_failures(), 1);
        assert!(!result.chunks[2].is_embedded());
        assert!(result.chunks[2].error().unwrap().contains("rejected input"));
        assert_eq!(result.vector_ids.len(), 4);

        let stored: Vec<i64> = store
            .inserted()
            .iter()
            .map(|r| r.metadata["chunk_index"].as_i64().unwrap())
            .collect();
        assert_eq!(stored, vec![0, 1, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_policy_rejects_document_with_no_embedded_chunks() {
        let mut harness = Harness::new();
        harness.provider = Arc::new(MockEmbeddingProvider::new(DIMS).failing_on("poison"));
        harness.settings.max_tokens = 16;
        harness.settings.failure_policy = EmbeddingFailurePolicy::SkipFailed;
        harness.storage = unused_storage();
        let store = Arc::new(MockVectorStore::new());
        harness.store = store.clone();
        let service = harness.build();

        let err = service
            .ingest(RawDocument::new("doc.txt", b"poison-aaaaaaaaapoison-bbbbbbbbb".to_vec()))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Embedding);
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_vector_store_exhaustion_alerts_once() {
        let mut harness = Harness::new();
        harness.store = Arc::new(MockVectorStore::new().failing_insert(3));
        harness.storage = unused_storage();
        let notifier = harness.notifier.clone();
        let service = harness.build();

        let err = service
            .ingest(RawDocument::new("doc.txt", b"some text".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::VectorStore {
                operation: StoreOperation::Insert,
                attempts: 3,
                ..
            }
        ));
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn test_infected_upload_is_rejected() {
        let mut harness = Harness::new();
        let mut scanner = MockVirusScanner::new();
        scanner.expect_name().return_const("mock");
        scanner.expect_scan().returning(|_, _| {
            Ok(ScanVerdict::Infected {
                signature: "Eicar-Test-Signature".to_string(),
            })
        });
        harness.scanner = scanner;
        harness.storage = unused_storage();
        let service = harness.build();

        let err = service
            .ingest(RawDocument::new("eicar.txt", b"X5O!P%@AP".to_vec()))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[tokio::test]
    async fn test_whitespace_document_is_empty_content() {
        let mut harness = Harness::new();
        harness.storage = unused_storage();
        let service = harness.build();

        let err = service
            .ingest(RawDocument::new("blank.txt", b"  \n\t ".to_vec()))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Parse);
    }

    #[tokio::test]
    async fn test_stored_records_carry_chunk_metadata() {
        let mut harness = Harness::new();
        let store = Arc::new(MockVectorStore::new());
        harness.store = store.clone();
        let service = harness.build();

        let result = service
            .ingest(RawDocument::new("Guide.txt", b"safety first".to_vec()))
            .await
            .unwrap();

        let record = &store.inserted()[0];
        assert_eq!(record.text, "safety first");
        assert_eq!(record.metadata["file_id"], result.file_id.as_str());
        assert_eq!(record.metadata["document_title"], "Guide.txt");
        assert_eq!(record.metadata["num_tokens"], 12);
        assert_eq!(
            record.metadata["content_sha256"],
            hex::encode(Sha256::digest(b"safety first")).as_str()
        );
    }

    #[tokio::test]
    async fn test_progress_stream_happy_path() {
        let service = Harness::new().build();

        let events: Vec<ProgressEvent> = service
            .ingest_with_progress(RawDocument::new("notes.txt", b"hello world".to_vec()))
            .collect()
            .await;

        let tags: Vec<&str> = events.iter().map(|e| e.tag()).collect();
        assert_eq!(tags, vec!["uploading", "scanning", "saving", "done"]);

        match events.last() {
            Some(ProgressEvent::Done { file_id, storage_url }) => {
                assert!(Uuid::parse_str(file_id).is_ok());
                assert!(storage_url.contains(file_id.as_str()));
            }
            other => panic!("expected done, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_progress_stream_validation_error() {
        let mut harness = Harness::new();
        harness.storage = unused_storage();
        let service = harness.build();

        let events: Vec<ProgressEvent> = service
            .ingest_with_progress(RawDocument::new("virus.exe", b"MZ".to_vec()))
            .collect()
            .await;

        assert_eq!(
            events,
            vec![
                ProgressEvent::Uploading,
                ProgressEvent::error("Unsupported file type. Allowed: pdf, txt, docx"),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_stream_single_terminal_on_failure() {
        let mut harness = Harness::new();
        harness.store = Arc::new(MockVectorStore::new().failing_insert(3));
        harness.storage = unused_storage();
        let service = harness.build();

        let events: Vec<ProgressEvent> = service
            .ingest_with_progress(RawDocument::new("doc.txt", b"text".to_vec()))
            .collect()
            .await;

        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        assert_eq!(
            events.last(),
            Some(&ProgressEvent::error("Vector database is unavailable"))
        );
        assert!(!events.iter().any(|e| matches!(e, ProgressEvent::Saving)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_progress_stream_abandons_work() {
        let mut harness = Harness::new();
        harness.provider = Arc::new(
            MockEmbeddingProvider::new(DIMS).delaying("slow", std::time::Duration::from_secs(5)),
        );
        harness.storage = unused_storage();
        let store = Arc::new(MockVectorStore::new());
        harness.store = store.clone();
        let service = harness.build();

        let mut stream =
            service.ingest_with_progress(RawDocument::new("slow.txt", b"slow text".to_vec()));

        assert_eq!(stream.next().await, Some(ProgressEvent::Uploading));
        assert_eq!(stream.next().await, Some(ProgressEvent::Scanning));
        drop(stream);

        // Well past the embedding delay, short of the per-attempt timeout
        tokio::time::sleep(std::time::Duration::from_secs(20)).await;
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_embedding_completes_when_stream_is_kept() {
        let mut harness = Harness::new();
        harness.provider = Arc::new(
            MockEmbeddingProvider::new(DIMS).delaying("slow", std::time::Duration::from_secs(5)),
        );
        let store = Arc::new(MockVectorStore::new());
        harness.store = store.clone();
        let service = harness.build();

        let events: Vec<ProgressEvent> = service
            .ingest_with_progress(RawDocument::new("slow.txt", b"slow text".to_vec()))
            .collect()
            .await;

        assert_eq!(store.insert_calls(), 1);
        assert!(matches!(events.last(), Some(ProgressEvent::Done { .. })));
    }
}
