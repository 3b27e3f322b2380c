//! Document retriever backed by a Pinecone index.

use std::sync::Arc;

use async_trait::async_trait;
use tessera_core::callbacks::{self, CallbackInput, CallbackOutput};
use tessera_core::{Component, Context, Document, Embedder, RetrieveOptions, Retriever};

use crate::config::RetrieverConfig;
use crate::context::make_embedding_context;
use crate::converter::{
    DefaultDocumentConverter, DefaultVectorConverter, DocumentConverter, VectorConverter,
};
use crate::error::{Error, Result};
use crate::index::{PineconeIndex, QueryRequest};
use crate::metadata;
use crate::{COMPONENT_TYPE, TRACING_TARGET};

/// Embeds a query, searches a Pinecone index and returns matching documents.
///
/// Every returned document carries its similarity score and, when the index
/// returned values, its dense vector.
#[derive(Clone)]
pub struct PineconeRetriever {
    index: Arc<dyn PineconeIndex>,
    embedder: Arc<dyn Embedder>,
    config: RetrieverConfig,
    vector_converter: Arc<dyn VectorConverter>,
    document_converter: Arc<dyn DocumentConverter>,
}

/// Options resolved from the configuration and per-call overrides.
struct ResolvedOptions<'a> {
    top_k: usize,
    score_threshold: Option<f64>,
    filter: Option<&'a serde_json::Value>,
}

impl ResolvedOptions<'_> {
    /// Applies the configuration checks to the merged options, since per-call
    /// overrides never went through [`RetrieverConfig::validate`].
    fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::invalid_config("Top k must be greater than 0"));
        }
        if self.score_threshold.is_some_and(f64::is_nan) {
            return Err(Error::invalid_config("Score threshold must be a number"));
        }
        Ok(())
    }
}

impl PineconeRetriever {
    /// Creates a retriever with the default converters.
    pub fn new(
        index: Arc<dyn PineconeIndex>,
        embedder: Arc<dyn Embedder>,
        config: RetrieverConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            index,
            embedder,
            config,
            vector_converter: Arc::new(DefaultVectorConverter),
            document_converter: Arc::new(DefaultDocumentConverter),
        })
    }

    /// Replaces the vector converter.
    pub fn with_vector_converter(mut self, converter: impl VectorConverter + 'static) -> Self {
        self.vector_converter = Arc::new(converter);
        self
    }

    /// Replaces the document converter.
    pub fn with_document_converter(mut self, converter: impl DocumentConverter + 'static) -> Self {
        self.document_converter = Arc::new(converter);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    fn resolve<'a>(&self, options: &'a RetrieveOptions) -> ResolvedOptions<'a> {
        ResolvedOptions {
            top_k: options.top_k.unwrap_or(self.config.top_k),
            score_threshold: options.score_threshold.or(self.config.score_threshold),
            filter: options.filter.as_ref(),
        }
    }

    async fn search(
        &self,
        ctx: &Context,
        query: &str,
        options: &ResolvedOptions<'_>,
    ) -> Result<Vec<Document>> {
        options.validate()?;

        let embedding_ctx = make_embedding_context(ctx, self.embedder.as_ref());
        let mut vectors = self
            .embedder
            .embed_strings(&embedding_ctx, &[query.to_owned()])
            .await?;
        if vectors.len() != 1 {
            return Err(Error::embedding_count(1, vectors.len()));
        }
        let vector = self.vector_converter.convert(&vectors.swap_remove(0))?;

        let mut request = QueryRequest::new(vector, options.top_k).with_metadata();
        if let Some(namespace) = &self.config.namespace {
            request = request.with_namespace(namespace.clone());
        }
        if let Some(filter) = options.filter {
            request = request.with_filter(metadata::filter_to_struct(filter)?);
        }

        let matches = self.index.query(request).await?;
        tracing::debug!(
            target: TRACING_TARGET,
            namespace = ?self.config.namespace,
            top_k = %options.top_k,
            matches = %matches.len(),
            "Queried index"
        );

        let mut documents = Vec::with_capacity(matches.len());
        for scored in matches {
            let score = f64::from(scored.score);
            if options.score_threshold.is_some_and(|threshold| score < threshold) {
                continue;
            }

            let mut document = self
                .document_converter
                .convert(&scored.record, &self.config.field)?
                .with_score(score);
            if !scored.record.values.is_empty() {
                let dense = scored.record.values.iter().map(|&v| f64::from(v)).collect();
                document = document.with_dense_vector(dense);
            }
            documents.push(document);
        }

        Ok(documents)
    }
}

#[async_trait]
impl Retriever for PineconeRetriever {
    type Error = Error;

    async fn retrieve(
        &self,
        ctx: &Context,
        query: &str,
        options: &RetrieveOptions,
    ) -> Result<Vec<Document>> {
        let options = self.resolve(options);
        let ctx = callbacks::ensure_run_info(ctx, Some(COMPONENT_TYPE), Component::Retriever);
        callbacks::on_start(
            &ctx,
            &CallbackInput::Retriever {
                query,
                top_k: options.top_k,
            },
        );

        match self.search(&ctx, query, &options).await {
            Ok(documents) => {
                callbacks::on_end(&ctx, &CallbackOutput::Retriever { documents: &documents });
                Ok(documents)
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Failed to retrieve documents"
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

impl std::fmt::Debug for PineconeRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeRetriever")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tessera_core::callbacks::Handler;
    use tessera_core::mock::{MockEmbedder, Phase, RecordingHandler};
    use tessera_core::{Indexer, Metadata};

    use super::*;
    use crate::config::IndexerConfig;
    use crate::indexer::PineconeIndexer;
    use crate::memory::MemoryIndex;
    use crate::record::{Record, ScoredRecord};

    fn embedder() -> Arc<MockEmbedder> {
        Arc::new(
            MockEmbedder::new(2)
                .with_type("Mock")
                .with_vector("apples", vec![1.0, 0.0])
                .with_vector("pears", vec![0.8, 0.6])
                .with_vector("cars", vec![0.0, 1.0])
                .with_vector("fruit", vec![1.0, 0.1]),
        )
    }

    async fn seeded_index(embedder: Arc<MockEmbedder>) -> Arc<MemoryIndex> {
        let index = Arc::new(MemoryIndex::new());
        let config = IndexerConfig::builder()
            .with_namespace("docs")
            .build()
            .unwrap();
        let indexer = PineconeIndexer::new(index.clone(), embedder, config).unwrap();

        let documents = vec![
            Document::new("a", "apples").with_field("kind", "fruit"),
            Document::new("p", "pears").with_field("kind", "fruit"),
            Document::new("c", "cars").with_field("kind", "vehicle"),
        ];
        indexer.store(&Context::new(), &documents).await.unwrap();
        index
    }

    fn retriever_config() -> RetrieverConfig {
        RetrieverConfig::builder()
            .with_namespace("docs")
            .with_top_k(2_usize)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_retrieve_returns_scored_documents() {
        let embedder = embedder();
        let index = seeded_index(embedder.clone()).await;
        let retriever = PineconeRetriever::new(index, embedder, retriever_config()).unwrap();

        let documents = retriever
            .retrieve(&Context::new(), "fruit", &RetrieveOptions::new())
            .await
            .unwrap();

        let ids: Vec<_> = documents.iter().map(|doc| doc.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "p"]);
        assert_eq!(documents[0].content, "apples");
        assert_eq!(documents[0].metadata.get("kind"), Some(&json!("fruit")));
        assert!(documents[0].score().unwrap() > documents[1].score().unwrap());
        assert!(documents[0].dense_vector().is_none());
    }

    #[tokio::test]
    async fn test_retrieve_applies_overrides() {
        let embedder = embedder();
        let index = seeded_index(embedder.clone()).await;
        let retriever = PineconeRetriever::new(index, embedder, retriever_config()).unwrap();

        let options = RetrieveOptions::new()
            .with_top_k(3)
            .with_score_threshold(0.5);
        let documents = retriever
            .retrieve(&Context::new(), "fruit", &options)
            .await
            .unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents.iter().all(|doc| doc.score().unwrap() >= 0.5));

        let options = RetrieveOptions::new().with_filter(json!({ "kind": "vehicle" }));
        let documents = retriever
            .retrieve(&Context::new(), "fruit", &options)
            .await
            .unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "c");
    }

    #[tokio::test]
    async fn test_retrieve_rejects_zero_top_k_override() {
        let embedder = embedder();
        let index = seeded_index(embedder.clone()).await;
        let retriever =
            PineconeRetriever::new(index, embedder.clone(), retriever_config()).unwrap();
        let calls = embedder.calls();

        let recorder = Arc::new(RecordingHandler::new());
        let ctx = Context::with_handlers([recorder.clone() as Arc<dyn Handler>]);
        let options = RetrieveOptions::new().with_top_k(0);
        let err = retriever
            .retrieve(&ctx, "fruit", &options)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(embedder.calls(), calls);
        assert_eq!(
            recorder.events(),
            vec![
                ("PineconeRetriever".to_owned(), Phase::Start),
                ("PineconeRetriever".to_owned(), Phase::Error),
            ]
        );
    }

    #[tokio::test]
    async fn test_retrieve_rejects_nan_threshold_override() {
        let embedder = embedder();
        let index = seeded_index(embedder.clone()).await;
        let retriever = PineconeRetriever::new(index, embedder, retriever_config()).unwrap();

        let recorder = Arc::new(RecordingHandler::new());
        let ctx = Context::with_handlers([recorder.clone() as Arc<dyn Handler>]);
        let options = RetrieveOptions::new().with_score_threshold(f64::NAN);
        let err = retriever
            .retrieve(&ctx, "fruit", &options)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(
            recorder.events().last(),
            Some(&("PineconeRetriever".to_owned(), Phase::Error))
        );
    }

    #[tokio::test]
    async fn test_retrieve_uses_configured_threshold() {
        let embedder = embedder();
        let index = seeded_index(embedder.clone()).await;
        let config = RetrieverConfig::builder()
            .with_namespace("docs")
            .with_top_k(3_usize)
            .with_score_threshold(0.99)
            .build()
            .unwrap();
        let retriever = PineconeRetriever::new(index, embedder, config).unwrap();

        let documents = retriever
            .retrieve(&Context::new(), "fruit", &RetrieveOptions::new())
            .await
            .unwrap();
        let ids: Vec<_> = documents.iter().map(|doc| doc.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[tokio::test]
    async fn test_retrieve_reports_callbacks() {
        let embedder = embedder();
        let index = seeded_index(embedder.clone()).await;
        let retriever = PineconeRetriever::new(index, embedder, retriever_config()).unwrap();

        let recorder = Arc::new(RecordingHandler::new());
        let ctx = Context::with_handlers([recorder.clone() as Arc<dyn Handler>]);
        retriever
            .retrieve(&ctx, "fruit", &RetrieveOptions::new())
            .await
            .unwrap();

        assert_eq!(
            recorder.events(),
            vec![
                ("PineconeRetriever".to_owned(), Phase::Start),
                ("MockEmbedding".to_owned(), Phase::Start),
                ("MockEmbedding".to_owned(), Phase::End),
                ("PineconeRetriever".to_owned(), Phase::End),
            ]
        );
    }

    #[tokio::test]
    async fn test_retrieve_fails_on_foreign_records() {
        let embedder = embedder();
        let index = Arc::new(MemoryIndex::new());
        let metadata: Metadata = [("title".to_owned(), json!("no content here"))]
            .into_iter()
            .collect();
        index
            .upsert(
                Some("docs"),
                vec![Record::new("x", vec![1.0, 0.0]).with_metadata(&metadata)],
            )
            .await
            .unwrap();

        let recorder = Arc::new(RecordingHandler::new());
        let ctx = Context::with_handlers([recorder.clone() as Arc<dyn Handler>]);
        let retriever = PineconeRetriever::new(index, embedder, retriever_config()).unwrap();

        let err = retriever
            .retrieve(&ctx, "fruit", &RetrieveOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(&err, Error::MissingContentField { field } if field == "content"));
        assert_eq!(
            recorder.events().last(),
            Some(&("PineconeRetriever".to_owned(), Phase::Error))
        );
    }

    #[tokio::test]
    async fn test_retrieve_rejects_non_object_filter() {
        let embedder = embedder();
        let index = seeded_index(embedder.clone()).await;
        let retriever = PineconeRetriever::new(index, embedder, retriever_config()).unwrap();

        let options = RetrieveOptions::new().with_filter(json!("kind = fruit"));
        let err = retriever
            .retrieve(&Context::new(), "fruit", &options)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(_)));
    }

    #[tokio::test]
    async fn test_retrieve_attaches_dense_vector() {
        struct ValuesIndex;

        #[async_trait]
        impl PineconeIndex for ValuesIndex {
            async fn upsert(&self, _namespace: Option<&str>, records: Vec<Record>) -> Result<usize> {
                Ok(records.len())
            }

            async fn query(&self, request: QueryRequest) -> Result<Vec<ScoredRecord>> {
                assert!(request.include_metadata);
                let metadata: Metadata = [("content".to_owned(), json!("hello"))]
                    .into_iter()
                    .collect();
                let record = Record::new("v", vec![0.5, 0.25]).with_metadata(&metadata);
                Ok(vec![ScoredRecord::new(record, 0.75)])
            }
        }

        let retriever = PineconeRetriever::new(
            Arc::new(ValuesIndex),
            embedder(),
            RetrieverConfig::default(),
        )
        .unwrap();

        let documents = retriever
            .retrieve(&Context::new(), "hello", &RetrieveOptions::new())
            .await
            .unwrap();
        assert_eq!(documents[0].score(), Some(0.75));
        assert_eq!(documents[0].dense_vector(), Some(vec![0.5, 0.25]));
        assert!(documents[0].metadata.contains_key(tessera_core::SCORE_KEY));
    }
}
