//! HTTP request/response types

pub mod documents;
pub mod error;
pub mod json;
pub mod search;

pub use documents::{ChunkResponse, UploadResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use search::{SearchHealthResponse, SearchRequest};
