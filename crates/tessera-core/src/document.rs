//! Framework-generic document type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic key/value metadata attached to documents and records.
pub type Metadata = serde_json::Map<String, Value>;

/// Reserved metadata key holding a retrieval score.
pub const SCORE_KEY: &str = "_score";

/// Reserved metadata key holding the dense vector of a document.
pub const DENSE_VECTOR_KEY: &str = "_dense_vector";

/// The generic unit of content moved between pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier of the document.
    pub id: String,
    /// Primary text content.
    pub content: String,
    /// Everything else known about the document.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Document {
    /// Creates a document with an id and content and no metadata.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Replaces the metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds a single metadata field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Attaches a retrieval score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.metadata.insert(SCORE_KEY.to_owned(), Value::from(score));
        self
    }

    /// Returns the retrieval score, if one was attached.
    pub fn score(&self) -> Option<f64> {
        self.metadata.get(SCORE_KEY).and_then(Value::as_f64)
    }

    /// Attaches the dense vector the document was indexed with.
    pub fn with_dense_vector(mut self, vector: Vec<f64>) -> Self {
        self.metadata
            .insert(DENSE_VECTOR_KEY.to_owned(), Value::from(vector));
        self
    }

    /// Returns the dense vector, if one was attached.
    pub fn dense_vector(&self) -> Option<Vec<f64>> {
        self.metadata
            .get(DENSE_VECTOR_KEY)?
            .as_array()?
            .iter()
            .map(Value::as_f64)
            .collect()
    }
}
