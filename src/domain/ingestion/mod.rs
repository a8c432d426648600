//! Document ingestion domain types

mod document;
mod policy;
mod progress;
mod result;
mod validation;

pub use document::RawDocument;
pub use policy::EmbeddingFailurePolicy;
pub use progress::{ProgressEvent, ProgressStage};
pub use result::IngestionResult;
pub use validation::{validate_upload, UploadLimits, DEFAULT_MAX_FILE_SIZE};
