//! Index client seam.

use async_trait::async_trait;
use prost_types::Struct;

use crate::error::Result;
use crate::record::{Record, ScoredRecord};

/// Similarity query against a Pinecone index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRequest {
    /// Query vector.
    pub vector: Vec<f32>,
    /// Maximum number of matches.
    pub top_k: usize,
    /// Namespace to search, the default namespace when `None`.
    pub namespace: Option<String>,
    /// Metadata filter.
    pub filter: Option<Struct>,
    /// Return record values with matches.
    pub include_values: bool,
    /// Return record metadata with matches.
    pub include_metadata: bool,
}

impl QueryRequest {
    /// Creates a query for the `top_k` nearest records to `vector`.
    pub fn new(vector: Vec<f32>, top_k: usize) -> Self {
        Self {
            vector,
            top_k,
            ..Self::default()
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set a metadata filter.
    pub fn with_filter(mut self, filter: Struct) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Include values in matches.
    pub fn with_values(mut self) -> Self {
        self.include_values = true;
        self
    }

    /// Include metadata in matches.
    pub fn with_metadata(mut self) -> Self {
        self.include_metadata = true;
        self
    }
}

/// Data-plane operations of a Pinecone index.
///
/// Implemented by whatever client talks to Pinecone; the indexer and
/// retriever only depend on this trait.
#[async_trait]
pub trait PineconeIndex: Send + Sync {
    /// Upserts records into a namespace and returns how many were written.
    async fn upsert(&self, namespace: Option<&str>, records: Vec<Record>) -> Result<usize>;

    /// Returns the best matches for the query, best first.
    async fn query(&self, request: QueryRequest) -> Result<Vec<ScoredRecord>>;
}
