//! Shared JSON-over-HTTP client

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let request = headers
            .into_iter()
            .fold(self.client.post(url), |request, (key, value)| request.header(key, value));

        let response = request.json(body).send().await.map_err(|e| {
            let reason = if e.is_timeout() { "timed out" } else { "failed" };
            DomainError::provider("http", format!("POST {} {}: {}", url, reason, e))
        })?;

        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                "http",
                format!("HTTP {} from {}: {}", status, url, truncate(&text)),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::provider("http", format!("Invalid JSON from {}: {}", url, e))
        })
    }
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
