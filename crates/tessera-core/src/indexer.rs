//! Indexer component trait.

use crate::context::Context;
use crate::document::Document;

/// Stores documents into a backing store.
#[async_trait::async_trait]
pub trait Indexer: Send + Sync {
    /// Error returned by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Stores the documents and returns their ids in input order.
    async fn store(
        &self,
        ctx: &Context,
        documents: &[Document],
    ) -> std::result::Result<Vec<String>, Self::Error>;

    /// Declared implementation type, e.g. `"Pinecone"`.
    fn component_type(&self) -> Option<&str> {
        None
    }
}
