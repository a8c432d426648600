//! One text in, one vector out

use serde::{Deserialize, Serialize};

/// Request to embed a single text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: String,
    /// Output size for models that can shorten their vectors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}

/// Vector produced for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// Model that actually served the request
    pub model: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
}

impl EmbeddingResponse {
    pub fn new(model: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            model: model.into(),
            vector,
            prompt_tokens: None,
        }
    }

    pub fn with_prompt_tokens(mut self, tokens: u32) -> Self {
        self.prompt_tokens = Some(tokens);
        self
    }

    /// Take the vector, rejecting it if it is empty or has the wrong length
    pub fn into_vector(self, expected_dimensions: Option<usize>) -> Result<Vec<f32>, String> {
        if self.vector.is_empty() {
            return Err("provider returned an empty vector".to_string());
        }

        match expected_dimensions {
            Some(expected) if expected != self.vector.len() => Err(format!(
                "expected {} dimensions, provider returned {}",
                expected,
                self.vector.len()
            )),
            _ => Ok(self.vector),
        }
    }
}
