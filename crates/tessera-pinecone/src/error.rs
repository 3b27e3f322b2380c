//! Pinecone integration error types.

use thiserror::Error;

/// Result type for Pinecone operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Pinecone integration errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The record metadata has no content field.
    #[error("[converter] content field not found, field: {field}")]
    MissingContentField { field: String },

    /// The content field holds something other than a string.
    #[error("[converter] content field is not a string, field: {field}, found: {found}")]
    ContentFieldType { field: String, found: &'static str },

    /// A document without an id cannot be upserted.
    #[error("[converter] document id is empty")]
    EmptyDocumentId,

    /// The embedder returned a different number of vectors than inputs.
    #[error("embedding count mismatch: expected {expected}, got {actual}")]
    EmbeddingCount { expected: usize, actual: usize },

    /// Metadata filter is not a JSON object.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error reported by the index client.
    #[error("backend error: {0}")]
    Backend(String),

    /// Error raised by a framework component.
    #[error(transparent)]
    Component(#[from] tessera_core::Error),
}

impl Error {
    /// Creates a missing content field error.
    pub fn missing_content_field(field: impl Into<String>) -> Self {
        Self::MissingContentField {
            field: field.into(),
        }
    }

    /// Creates a content field type error.
    pub fn content_field_type(field: impl Into<String>, found: &'static str) -> Self {
        Self::ContentFieldType {
            field: field.into(),
            found,
        }
    }

    /// Creates an embedding count mismatch error.
    pub fn embedding_count(expected: usize, actual: usize) -> Self {
        Self::EmbeddingCount { expected, actual }
    }

    /// Creates an invalid filter error.
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }

    /// Creates an invalid config error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
