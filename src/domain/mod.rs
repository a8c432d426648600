//! Domain layer - Core business logic and entities

pub mod blob_storage;
pub mod chunking;
pub mod embedding;
pub mod error;
pub mod extraction;
pub mod ingestion;
pub mod retrieval;
pub mod retry;
pub mod scanner;
pub mod vector_store;

pub use blob_storage::{BlobStorage, StoredObject};
pub use chunking::{Chunk, TokenChunker, Tokenizer};
pub use embedding::{
    EmbeddedChunk, EmbeddingBatch, EmbeddingOutcome, EmbeddingProvider, EmbeddingRequest,
    EmbeddingResponse,
};
pub use error::{DomainError, ErrorCategory, ParseErrorKind, StoreOperation};
pub use extraction::{DocumentFormat, TextExtractor};
pub use ingestion::{
    EmbeddingFailurePolicy, IngestionResult, ProgressEvent, RawDocument, UploadLimits,
};
pub use retrieval::{SearchQuery, SearchResponse, SearchResult};
pub use retry::RetryConfig;
pub use scanner::{ScanVerdict, VirusScanner};
pub use vector_store::{
    AdminAlert, AdminNotifier, CollectionSchema, SearchHit, VectorRecord, VectorStore,
};
