//! In-memory vector store for development and testing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::domain::vector_store::{CollectionSchema, SearchHit, VectorRecord, VectorStore};
use crate::domain::DomainError;

/// Brute-force store with Milvus-compatible semantics
///
/// Distances are squared Euclidean, matching Milvus' `L2` metric, and ids are
/// sequential integers per collection.
#[derive(Debug, Default, Clone)]
pub struct InMemoryVectorStore {
    collections: Arc<RwLock<HashMap<String, StoredCollection>>>,
}

#[derive(Debug)]
struct StoredCollection {
    dimensions: usize,
    next_id: u64,
    rows: Vec<StoredRow>,
}

#[derive(Debug, Clone)]
struct StoredRow {
    id: u64,
    vector: Vec<f32>,
    text: String,
    metadata: Map<String, Value>,
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn check_dimensions(expected: usize, actual: usize) -> Result<(), DomainError> {
    if expected != actual {
        return Err(DomainError::provider(
            "in_memory",
            format!("Vector dimension mismatch: expected {}, got {}", expected, actual),
        ));
    }

    Ok(())
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in a collection
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.rows.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn backend_name(&self) -> &'static str {
        "in_memory"
    }

    async fn ensure_collection(&self, schema: &CollectionSchema) -> Result<(), DomainError> {
        self.collections
            .write()
            .await
            .entry(schema.name.clone())
            .or_insert_with(|| StoredCollection {
                dimensions: schema.dimensions,
                next_id: 1,
                rows: Vec::new(),
            });

        Ok(())
    }

    async fn insert(
        &self,
        schema: &CollectionSchema,
        records: &[VectorRecord],
    ) -> Result<Vec<String>, DomainError> {
        let mut collections = self.collections.write().await;
        let collection = collections.get_mut(&schema.name).ok_or_else(|| {
            DomainError::provider("in_memory", format!("Collection {} does not exist", schema.name))
        })?;

        for record in records {
            check_dimensions(collection.dimensions, record.dimensions())?;

            if record.text.len() > schema.max_text_length {
                return Err(DomainError::provider(
                    "in_memory",
                    format!("Text exceeds {} bytes", schema.max_text_length),
                ));
            }
        }

        let ids = records
            .iter()
            .map(|record| {
                let id = collection.next_id;
                collection.next_id += 1;
                collection.rows.push(StoredRow {
                    id,
                    vector: record.vector.clone(),
                    text: record.text.clone(),
                    metadata: record.metadata.clone(),
                });
                id.to_string()
            })
            .collect();

        Ok(ids)
    }

    async fn search(
        &self,
        schema: &CollectionSchema,
        vector: &[f32],
        limit: usize,
        _nprobe: u32,
    ) -> Result<Vec<SearchHit>, DomainError> {
        let collections = self.collections.read().await;
        let collection = collections.get(&schema.name).ok_or_else(|| {
            DomainError::provider("in_memory", format!("Collection {} does not exist", schema.name))
        })?;

        check_dimensions(collection.dimensions, vector.len())?;

        let mut scored: Vec<(f32, &StoredRow)> = collection
            .rows
            .iter()
            .map(|row| (squared_l2(&row.vector, vector), row))
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(distance, row)| {
                SearchHit::new(row.text.clone(), row.metadata.clone(), distance)
                    .with_id(row.id.to_string())
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> CollectionSchema {
        CollectionSchema::new("docs", 2, 16)
    }

    async fn seeded() -> InMemoryVectorStore {
        let store = InMemoryVectorStore::new();
        store.ensure_collection(&schema()).await.unwrap();
        store
            .insert(
                &schema(),
                &[
                    VectorRecord::new(vec![0.0, 0.0], "origin"),
                    VectorRecord::new(vec![1.0, 0.0], "east"),
                    VectorRecord::new(vec![0.0, 3.0], "far north"),
                ],
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection(&schema()).await.unwrap();

        let ids = store
            .insert(
                &schema(),
                &[
                    VectorRecord::new(vec![0.0, 1.0], "a"),
                    VectorRecord::new(vec![1.0, 0.0], "b"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(store.len("docs").await, 2);
    }

    #[tokio::test]
    async fn test_search_orders_by_squared_distance() {
        let store = seeded().await;

        let hits = store.search(&schema(), &[0.9, 0.0], 3, 10).await.unwrap();

        let texts: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["east", "origin", "far north"]);
        assert!((hits[0].distance - 0.01).abs() < 1e-6);
        assert!((hits[1].distance - 0.81).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let store = seeded().await;
        let hits = store.search(&schema(), &[0.0, 0.0], 1, 10).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "origin");
        assert_eq!(hits[0].distance, 0.0);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let store = seeded().await;

        assert!(store
            .insert(&schema(), &[VectorRecord::new(vec![1.0], "short")])
            .await
            .is_err());
        assert!(store.search(&schema(), &[1.0, 2.0, 3.0], 1, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_collection() {
        let store = InMemoryVectorStore::new();
        assert!(store.search(&schema(), &[0.0, 0.0], 1, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_text_bound_is_enforced() {
        let store = seeded().await;
        let long = "x".repeat(17);

        assert!(store
            .insert(&schema(), &[VectorRecord::new(vec![0.0, 0.0], long)])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_text_bound_counts_bytes() {
        let store = seeded().await;
        // Six syllables, eighteen bytes
        let hangul = "가".repeat(6);

        assert!(store
            .insert(&schema(), &[VectorRecord::new(vec![0.0, 0.0], hangul)])
            .await
            .is_err());
    }
}
