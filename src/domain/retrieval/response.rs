//! Search results and response

use serde::{Deserialize, Serialize};

use crate::domain::vector_store::SearchHit;

/// Title used when a hit carries no `document_title` metadata
pub const UNTITLED_DOCUMENT: &str = "Untitled document";

/// One ranked passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    pub document_title: String,
    pub page_number: Option<u32>,
    /// `1 - L2 distance`; higher is closer but this is not a probability
    pub confidence_score: f32,
    pub source_chunk: String,
}

impl From<SearchHit> for SearchResult {
    fn from(hit: SearchHit) -> Self {
        let confidence_score = hit.confidence();

        let document_title = hit
            .metadata
            .get("document_title")
            .and_then(|v| v.as_str())
            .unwrap_or(UNTITLED_DOCUMENT)
            .to_string();

        let page_number = hit
            .metadata
            .get("page_number")
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok());

        Self {
            source_chunk: hit.text.clone(),
            content: hit.text,
            document_title,
            page_number,
            confidence_score,
        }
    }
}

/// Response to one search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Placeholder until answer generation exists
    pub answer: String,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    /// Wall-clock seconds spent serving the query
    pub processing_time: f64,
}

/// Fixed answer text echoing the query
pub fn placeholder_answer(query: &str) -> String {
    format!(
        "Answer to '{}'. Generated from the passages found in the related documents.",
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn test_result_from_hit_with_metadata() {
        let metadata = json!({ "document_title": "Handbook", "page_number": 4 });
        let hit = SearchHit::new("vacation policy", metadata.as_object().unwrap().clone(), 0.25);

        let result = SearchResult::from(hit);

        assert_eq!(result.content, "vacation policy");
        assert_eq!(result.source_chunk, "vacation policy");
        assert_eq!(result.document_title, "Handbook");
        assert_eq!(result.page_number, Some(4));
        assert!((result.confidence_score - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_result_from_hit_without_metadata() {
        let result = SearchResult::from(SearchHit::new("text", Map::new(), 0.0));

        assert_eq!(result.document_title, UNTITLED_DOCUMENT);
        assert_eq!(result.page_number, None);
        assert_eq!(result.confidence_score, 1.0);
    }

    #[test]
    fn test_placeholder_answer_mentions_query() {
        assert!(placeholder_answer("refunds").contains("'refunds'"));
    }
}
