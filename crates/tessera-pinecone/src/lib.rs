#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod metadata;

mod config;
mod context;
mod converter;
mod error;
mod index;
mod indexer;
#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod record;
mod retriever;

pub use config::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONTENT_FIELD, DEFAULT_TOP_K, IndexerConfig, IndexerConfigBuilder,
    IndexerConfigBuilderError, RetrieverConfig, RetrieverConfigBuilder, RetrieverConfigBuilderError,
};
pub use context::make_embedding_context;
pub use converter::{
    DefaultDocumentConverter, DefaultRecordConverter, DefaultVectorConverter, DocumentConverter,
    RecordConverter, VectorConverter, document_to_record, narrow_vector, record_to_document,
};
pub use error::{Error, Result};
pub use index::{PineconeIndex, QueryRequest};
pub use indexer::PineconeIndexer;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use memory::MemoryIndex;
pub use record::{Record, ScoredRecord};
pub use retriever::PineconeRetriever;

/// Component type reported by the indexer and retriever.
pub const COMPONENT_TYPE: &str = "Pinecone";

/// Tracing target for Pinecone operations.
pub const TRACING_TARGET: &str = "tessera_pinecone";
