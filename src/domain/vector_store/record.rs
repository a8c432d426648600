//! Records written to and hits read from the vector store

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names that never appear in record metadata
pub const RESERVED_FIELDS: [&str; 2] = ["vector", "text"];

/// A vector with its source text and free-form metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: Map<String, Value>,
}

impl VectorRecord {
    pub fn new(vector: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            vector,
            text: text.into(),
            metadata: Map::new(),
        }
    }

    /// Build a record from a flat field map
    ///
    /// `vector` and `text` are lifted out; every other field becomes metadata.
    pub fn from_fields(mut fields: Map<String, Value>) -> Option<Self> {
        let vector = fields
            .remove("vector")?
            .as_array()?
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect::<Option<Vec<f32>>>()?;

        let text = match fields.remove("text")? {
            Value::String(s) => s,
            _ => return None,
        };

        Some(Self {
            vector,
            text,
            metadata: fields,
        })
    }

    /// Add a metadata field; reserved names are ignored
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();

        if !RESERVED_FIELDS.contains(&key.as_str()) {
            self.metadata.insert(key, value.into());
        }

        self
    }

    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// One nearest-neighbour result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Option<String>,
    pub text: String,
    pub metadata: Map<String, Value>,
    /// L2 distance to the query; lower is closer
    pub distance: f32,
}

impl SearchHit {
    pub fn new(text: impl Into<String>, metadata: Map<String, Value>, distance: f32) -> Self {
        Self {
            id: None,
            text: text.into(),
            metadata,
            distance,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// `1 - distance`
    ///
    /// Not a probability: L2 distances above 1 give negative values.
    pub fn confidence(&self) -> f32 {
        1.0 - self.distance
    }
}
