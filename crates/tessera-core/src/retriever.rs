//! Retriever component trait.

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::document::Document;

/// Per-call overrides for a retrieval.
///
/// Unset fields fall back to the retriever's configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrieveOptions {
    /// Maximum number of documents to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    /// Minimum score a document must reach to be returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f64>,
    /// Metadata filter, in the store's own filter language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
}

impl RetrieveOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of documents to return.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Sets the minimum score.
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    /// Sets the metadata filter.
    pub fn with_filter(mut self, filter: serde_json::Value) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Fetches documents relevant to a query.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Error returned by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the documents matching `query`, best first.
    async fn retrieve(
        &self,
        ctx: &Context,
        query: &str,
        options: &RetrieveOptions,
    ) -> std::result::Result<Vec<Document>, Self::Error>;

    /// Declared implementation type, e.g. `"Pinecone"`.
    fn component_type(&self) -> Option<&str> {
        None
    }
}
