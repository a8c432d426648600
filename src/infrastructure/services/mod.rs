//! Infrastructure services

mod ingestion_service;
mod retrieval_service;

pub use ingestion_service::{
    IngestionService, IngestionServiceDeps, IngestionServiceTrait, IngestionSettings,
};
pub use retrieval_service::{RetrievalService, RetrievalServiceTrait, RetrievalStatus};
