//! Validated search query

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const MAX_QUERY_CHARS: usize = 1000;
pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const MAX_RESULTS_LIMIT: usize = 20;

/// A natural-language query with its result limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    query: String,
    max_results: usize,
}

impl SearchQuery {
    /// Validate and build a query
    ///
    /// `query` must be 1 to 1000 characters and not only whitespace;
    /// `max_results` must be within 1..=20 and defaults to 5.
    pub fn new(query: impl Into<String>, max_results: Option<usize>) -> Result<Self, DomainError> {
        let query = query.into();
        let chars = query.chars().count();

        if chars == 0 || query.trim().is_empty() {
            return Err(DomainError::validation("Query must not be empty"));
        }

        if chars > MAX_QUERY_CHARS {
            return Err(DomainError::validation(format!(
                "Query cannot exceed {} characters",
                MAX_QUERY_CHARS
            )));
        }

        let max_results = max_results.unwrap_or(DEFAULT_MAX_RESULTS);

        if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
            return Err(DomainError::validation(format!(
                "max_results must be between 1 and {}",
                MAX_RESULTS_LIMIT
            )));
        }

        Ok(Self { query, max_results })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}
