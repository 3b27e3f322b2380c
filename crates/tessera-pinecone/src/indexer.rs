//! Document indexer backed by a Pinecone index.

use std::sync::Arc;

use async_trait::async_trait;
use tessera_core::callbacks::{self, CallbackInput, CallbackOutput};
use tessera_core::{Component, Context, Document, Embedder, Indexer};

use crate::config::IndexerConfig;
use crate::context::make_embedding_context;
use crate::converter::{
    DefaultRecordConverter, DefaultVectorConverter, RecordConverter, VectorConverter,
};
use crate::error::{Error, Result};
use crate::index::PineconeIndex;
use crate::record::Record;
use crate::{COMPONENT_TYPE, TRACING_TARGET};

/// Embeds documents and upserts them into a Pinecone index.
///
/// Each document becomes one record: the embedding as values, the document
/// metadata plus the content (under the configured field) as metadata.
#[derive(Clone)]
pub struct PineconeIndexer {
    index: Arc<dyn PineconeIndex>,
    embedder: Arc<dyn Embedder>,
    config: IndexerConfig,
    vector_converter: Arc<dyn VectorConverter>,
    record_converter: Arc<dyn RecordConverter>,
}

impl PineconeIndexer {
    /// Creates an indexer with the default converters.
    pub fn new(
        index: Arc<dyn PineconeIndex>,
        embedder: Arc<dyn Embedder>,
        config: IndexerConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            index,
            embedder,
            config,
            vector_converter: Arc::new(DefaultVectorConverter),
            record_converter: Arc::new(DefaultRecordConverter),
        })
    }

    /// Replaces the vector converter.
    pub fn with_vector_converter(mut self, converter: impl VectorConverter + 'static) -> Self {
        self.vector_converter = Arc::new(converter);
        self
    }

    /// Replaces the record converter.
    pub fn with_record_converter(mut self, converter: impl RecordConverter + 'static) -> Self {
        self.record_converter = Arc::new(converter);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    async fn store_batches(&self, ctx: &Context, documents: &[Document]) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(documents.len());

        for batch in documents.chunks(self.config.batch_size.max(1)) {
            let records = self.convert_batch(ctx, batch).await?;
            let written = self
                .index
                .upsert(self.config.namespace.as_deref(), records)
                .await?;

            tracing::debug!(
                target: TRACING_TARGET,
                namespace = ?self.config.namespace,
                count = %written,
                "Upserted batch"
            );
            ids.extend(batch.iter().map(|doc| doc.id.clone()));
        }

        Ok(ids)
    }

    async fn convert_batch(&self, ctx: &Context, batch: &[Document]) -> Result<Vec<Record>> {
        let texts: Vec<String> = batch.iter().map(|doc| doc.content.clone()).collect();

        let embedding_ctx = make_embedding_context(ctx, self.embedder.as_ref());
        let vectors = self.embedder.embed_strings(&embedding_ctx, &texts).await?;
        if vectors.len() != batch.len() {
            return Err(Error::embedding_count(batch.len(), vectors.len()));
        }

        batch
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| {
                let values = self.vector_converter.convert(&vector)?;
                self.record_converter
                    .convert(doc, values, &self.config.field)
            })
            .collect()
    }
}

#[async_trait]
impl Indexer for PineconeIndexer {
    type Error = Error;

    async fn store(&self, ctx: &Context, documents: &[Document]) -> Result<Vec<String>> {
        let ctx = callbacks::ensure_run_info(ctx, Some(COMPONENT_TYPE), Component::Indexer);
        callbacks::on_start(&ctx, &CallbackInput::Indexer { documents });

        match self.store_batches(&ctx, documents).await {
            Ok(ids) => {
                callbacks::on_end(&ctx, &CallbackOutput::Indexer { ids: &ids });
                Ok(ids)
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    count = %documents.len(),
                    "Failed to store documents"
                );
                callbacks::on_error(&ctx, &err);
                Err(err)
            }
        }
    }

    fn component_type(&self) -> Option<&str> {
        Some(COMPONENT_TYPE)
    }
}

impl std::fmt::Debug for PineconeIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeIndexer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
