//! Infrastructure layer - External service implementations

pub mod blob_storage;
pub mod embedding;
pub mod extraction;
pub mod http_client;
pub mod logging;
pub mod observability;
pub mod scanner;
pub mod services;
pub mod tokenizer;
pub mod vector_store;
