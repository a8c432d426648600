//! Upload request/response types

use serde::{Deserialize, Serialize};

use crate::domain::embedding::{EmbeddedChunk, EmbeddingOutcome};
use crate::domain::IngestionResult;

/// One chunk as returned to the uploader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkResponse {
    pub index: usize,
    pub start_token: usize,
    pub end_token: usize,
    pub num_tokens: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_error: Option<String>,
}

impl From<EmbeddedChunk> for ChunkResponse {
    fn from(embedded: EmbeddedChunk) -> Self {
        let (embedding, embedding_error) = match embedded.outcome {
            EmbeddingOutcome::Vector(vector) => (Some(vector), None),
            EmbeddingOutcome::Failed(error) => (None, Some(error)),
        };
        let chunk = embedded.chunk;

        Self {
            index: chunk.index,
            start_token: chunk.start_token,
            end_token: chunk.end_token,
            num_tokens: chunk.num_tokens,
            text: chunk.text,
            embedding,
            embedding_error,
        }
    }
}

/// Single-shot upload result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub filename: String,
    pub size: usize,
    pub storage_url: String,
    pub text: String,
    pub chunks: Vec<ChunkResponse>,
    pub vector_ids: Vec<String>,
    pub embedding_failures: usize,
}

impl From<IngestionResult> for UploadResponse {
    fn from(result: IngestionResult) -> Self {
        let embedding_failures = result.embedding_failures();

        Self {
            file_id: result.file_id,
            filename: result.filename,
            size: result.size,
            storage_url: result.storage_url,
            text: result.text,
            chunks: result.chunks.into_iter().map(ChunkResponse::from).collect(),
            vector_ids: result.vector_ids,
            embedding_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Chunk;

    #[test]
    fn test_failed_chunk_has_error_and_no_embedding() {
        let chunk = Chunk::new(2, 1024, 1100, "tail");
        let response = ChunkResponse::from(EmbeddedChunk::failed(chunk, "rate limited"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["embedding_error"], "rate limited");
        assert!(json.get("embedding").is_none());
        assert_eq!(json["num_tokens"], 76);
    }

    #[test]
    fn test_upload_response_counts_failures() {
        let result = IngestionResult {
            file_id: "f".to_string(),
            filename: "a.txt".to_string(),
            size: 8,
            storage_url: "uploads/f/a.txt".to_string(),
            text: "abcdefgh".to_string(),
            chunks: vec![
                EmbeddedChunk::embedded(Chunk::new(0, 0, 4, "abcd"), vec![0.1, 0.2]),
                EmbeddedChunk::failed(Chunk::new(1, 4, 8, "efgh"), "timeout"),
            ],
            vector_ids: vec!["1".to_string()],
        };

        let response = UploadResponse::from(result);

        assert_eq!(response.embedding_failures, 1);
        assert_eq!(response.chunks[0].embedding.as_deref(), Some(&[0.1f32, 0.2][..]));
        assert_eq!(response.chunks[1].embedding_error.as_deref(), Some("timeout"));
    }
}
