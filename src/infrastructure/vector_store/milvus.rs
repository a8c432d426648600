//! Milvus backend over the RESTful v2 API

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::domain::vector_store::{CollectionSchema, SearchHit, VectorRecord, VectorStore};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const VECTOR_FIELD: &str = "embedding";
const TEXT_FIELD: &str = "text";
const META_FIELD: &str = "meta";
const DEFAULT_NLIST: u32 = 128;

/// Milvus client speaking `/v2/vectordb/*`
#[derive(Debug)]
pub struct MilvusVectorStore<C: HttpClientTrait> {
    client: C,
    base_url: String,
    auth_header: Option<String>,
}

/// Common envelope of every v2 response
#[derive(Debug, Deserialize)]
struct MilvusEnvelope {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

impl<C: HttpClientTrait> MilvusVectorStore<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_header: None,
        }
    }

    /// Authenticate with an API key or `user:password` token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_header = Some(format!("Bearer {}", token.into()));
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2/vectordb/{}", self.base_url, path)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    async fn call(&self, path: &str, body: Value) -> Result<Value, DomainError> {
        let response = self
            .client
            .post_json(&self.url(path), self.headers(), &body)
            .await?;

        let envelope: MilvusEnvelope = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("milvus", format!("Unexpected response from {}: {}", path, e))
        })?;

        if envelope.code != 0 {
            return Err(DomainError::provider(
                "milvus",
                format!(
                    "{} returned code {}: {}",
                    path,
                    envelope.code,
                    envelope.message.unwrap_or_default()
                ),
            ));
        }

        Ok(envelope.data)
    }

    fn create_body(schema: &CollectionSchema) -> Value {
        json!({
            "collectionName": schema.name,
            "schema": {
                "autoId": true,
                "enableDynamicField": false,
                "fields": [
                    { "fieldName": "id", "dataType": "Int64", "isPrimary": true },
                    {
                        "fieldName": VECTOR_FIELD,
                        "dataType": "FloatVector",
                        "elementTypeParams": { "dim": schema.dimensions.to_string() }
                    },
                    {
                        "fieldName": TEXT_FIELD,
                        "dataType": "VarChar",
                        "elementTypeParams": { "max_length": schema.max_text_length.to_string() }
                    },
                    { "fieldName": META_FIELD, "dataType": "JSON" }
                ]
            },
            "indexParams": [{
                "fieldName": VECTOR_FIELD,
                "indexName": format!("{}_index", VECTOR_FIELD),
                "metricType": "L2",
                "params": { "index_type": "IVF_FLAT", "nlist": DEFAULT_NLIST }
            }]
        })
    }

    fn parse_ids(data: &Value) -> Result<Vec<String>, DomainError> {
        let ids = data
            .get("insertIds")
            .and_then(Value::as_array)
            .ok_or_else(|| DomainError::provider("milvus", "Insert response has no insertIds"))?;

        ids.iter()
            .map(|id| match id {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(DomainError::provider(
                    "milvus",
                    format!("Unexpected id type: {}", other),
                )),
            })
            .collect()
    }

    fn parse_hits(data: Value) -> Result<Vec<SearchHit>, DomainError> {
        let rows = match data {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            other => {
                return Err(DomainError::provider(
                    "milvus",
                    format!("Unexpected search payload: {}", other),
                ))
            }
        };

        let mut hits: Vec<SearchHit> = rows
            .into_iter()
            .map(|row| {
                let distance = row.get("distance").and_then(Value::as_f64).unwrap_or(0.0) as f32;
                let text = row
                    .get(TEXT_FIELD)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let metadata = match row.get(META_FIELD) {
                    Some(Value::Object(map)) => map.clone(),
                    _ => Map::new(),
                };

                let hit = SearchHit::new(text, metadata, distance);

                match row.get("id") {
                    Some(Value::String(s)) => hit.with_id(s.clone()),
                    Some(Value::Number(n)) => hit.with_id(n.to_string()),
                    _ => hit,
                }
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        Ok(hits)
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorStore for MilvusVectorStore<C> {
    fn backend_name(&self) -> &'static str {
        "milvus"
    }

    async fn ensure_collection(&self, schema: &CollectionSchema) -> Result<(), DomainError> {
        let has = self
            .call("collections/has", json!({ "collectionName": schema.name }))
            .await?;

        if has.get("has").and_then(Value::as_bool).unwrap_or(false) {
            debug!(collection = %schema.name, "Milvus collection exists");
            return Ok(());
        }

        self.call("collections/create", Self::create_body(schema))
            .await?;

        info!(
            collection = %schema.name,
            dimensions = schema.dimensions,
            "Created Milvus collection"
        );

        Ok(())
    }

    async fn insert(
        &self,
        schema: &CollectionSchema,
        records: &[VectorRecord],
    ) -> Result<Vec<String>, DomainError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let data: Vec<Value> = records
            .iter()
            .map(|r| {
                let mut row = Map::new();
                row.insert(VECTOR_FIELD.to_string(), json!(r.vector));
                row.insert(TEXT_FIELD.to_string(), Value::String(r.text.clone()));
                row.insert(META_FIELD.to_string(), Value::Object(r.metadata.clone()));
                Value::Object(row)
            })
            .collect();

        let response = self
            .call(
                "entities/insert",
                json!({ "collectionName": schema.name, "data": data }),
            )
            .await?;

        let ids = Self::parse_ids(&response)?;

        if ids.len() != records.len() {
            return Err(DomainError::provider(
                "milvus",
                format!("Inserted {} records but got {} ids", records.len(), ids.len()),
            ));
        }

        Ok(ids)
    }

    async fn search(
        &self,
        schema: &CollectionSchema,
        vector: &[f32],
        limit: usize,
        nprobe: u32,
    ) -> Result<Vec<SearchHit>, DomainError> {
        let body = json!({
            "collectionName": schema.name,
            "data": [vector],
            "annsField": VECTOR_FIELD,
            "limit": limit,
            "outputFields": [TEXT_FIELD, META_FIELD],
            "searchParams": {
                "metricType": "L2",
                "params": { "nprobe": nprobe }
            }
        });

        let data = self.call("entities/search", body).await?;

        Self::parse_hits(data)
    }
}
