//! Retrieval domain types

mod query;
mod response;

pub use query::{SearchQuery, DEFAULT_MAX_RESULTS, MAX_QUERY_CHARS, MAX_RESULTS_LIMIT};
pub use response::{placeholder_answer, SearchResponse, SearchResult, UNTITLED_DOCUMENT};
