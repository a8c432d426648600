//! OpenAI-compatible `/v1/embeddings` client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const PROVIDER: &str = "openai";

/// Only the `text-embedding-3` family accepts a `dimensions` override
fn accepts_dimensions(model: &str) -> bool {
    model.starts_with("text-embedding-3")
}

/// Embeds text through the OpenAI embeddings API
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    endpoint: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Target a self-hosted or proxied OpenAI-compatible server
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();

        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            endpoint: format!("{}/v1/embeddings", base_url.trim_end_matches('/')),
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let body = serde_json::to_value(WireRequest {
            model: &request.model,
            input: &request.input,
            dimensions: request.dimensions.filter(|_| accepts_dimensions(&request.model)),
            encoding_format: "float",
        })
        .map_err(|e| DomainError::provider(PROVIDER, format!("Failed to encode request: {}", e)))?;

        let json = self.client.post_json(&self.endpoint, self.headers(), &body).await?;

        let wire: WireResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Failed to parse embedding response: {}", e))
        })?;

        // One input was sent, so only index 0 belongs to it
        let vector = wire
            .data
            .into_iter()
            .find(|d| d.index == 0)
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::provider(PROVIDER, "Embedding response contained no data"))?;

        debug!(model = %wire.model, dimensions = vector.len(), "Embedding received");

        let response = EmbeddingResponse::new(wire.model, vector);

        Ok(match wire.usage {
            Some(usage) => response.with_prompt_tokens(usage.prompt_tokens),
            None => response,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    encoding_format: &'static str,
}

#[derive(Deserialize)]
struct WireResponse {
    model: String,
    data: Vec<WireEmbedding>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireEmbedding {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
}
