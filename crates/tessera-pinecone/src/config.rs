//! Indexer and retriever configuration.

#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Metadata field holding document content by default.
pub const DEFAULT_CONTENT_FIELD: &str = "content";

/// Documents embedded and upserted per request by default.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Documents returned per query by default.
pub const DEFAULT_TOP_K: usize = 5;

fn default_field() -> String {
    DEFAULT_CONTENT_FIELD.to_owned()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn check_field(field: &str) -> std::result::Result<(), String> {
    if field.is_empty() {
        return Err("Content field must not be empty".to_string());
    }
    Ok(())
}

/// Configuration for [`PineconeIndexer`](crate::PineconeIndexer).
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[builder(
    name = "IndexerConfigBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct IndexerConfig {
    /// Namespace records are upserted into; the default namespace if unset.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(
        feature = "config",
        arg(long = "pinecone-indexer-namespace", env = "PINECONE_INDEXER_NAMESPACE")
    )]
    pub namespace: Option<String>,

    /// Metadata field the document content is written to.
    #[builder(default = "default_field()")]
    #[serde(default = "default_field")]
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pinecone-indexer-field",
            env = "PINECONE_INDEXER_FIELD",
            default_value = DEFAULT_CONTENT_FIELD
        )
    )]
    pub field: String,

    /// Documents embedded and upserted per request.
    #[builder(default = "default_batch_size()")]
    #[serde(default = "default_batch_size")]
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pinecone-indexer-batch-size",
            env = "PINECONE_INDEXER_BATCH_SIZE",
            default_value_t = DEFAULT_BATCH_SIZE
        )
    )]
    pub batch_size: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            field: default_field(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl IndexerConfig {
    /// Create a new configuration builder
    pub fn builder() -> IndexerConfigBuilder {
        IndexerConfigBuilder::default()
    }

    /// Checks a configuration that did not go through the builder.
    pub fn validate(&self) -> Result<()> {
        check_field(&self.field).map_err(Error::invalid_config)?;
        if self.batch_size == 0 {
            return Err(Error::invalid_config("Batch size must be greater than 0"));
        }
        Ok(())
    }
}

impl IndexerConfigBuilder {
    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(field) = &self.field {
            check_field(field)?;
        }

        if let Some(batch_size) = &self.batch_size {
            if *batch_size == 0 {
                return Err("Batch size must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}

impl From<IndexerConfigBuilderError> for Error {
    fn from(err: IndexerConfigBuilderError) -> Self {
        Self::invalid_config(err.to_string())
    }
}

/// Configuration for [`PineconeRetriever`](crate::PineconeRetriever).
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[builder(
    name = "RetrieverConfigBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct RetrieverConfig {
    /// Namespace queried; the default namespace if unset.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(
        feature = "config",
        arg(long = "pinecone-retriever-namespace", env = "PINECONE_RETRIEVER_NAMESPACE")
    )]
    pub namespace: Option<String>,

    /// Metadata field the document content is read from.
    #[builder(default = "default_field()")]
    #[serde(default = "default_field")]
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pinecone-retriever-field",
            env = "PINECONE_RETRIEVER_FIELD",
            default_value = DEFAULT_CONTENT_FIELD
        )
    )]
    pub field: String,

    /// Documents returned per query.
    #[builder(default = "default_top_k()")]
    #[serde(default = "default_top_k")]
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pinecone-retriever-top-k",
            env = "PINECONE_RETRIEVER_TOP_K",
            default_value_t = DEFAULT_TOP_K
        )
    )]
    pub top_k: usize,

    /// Matches scoring below this are dropped. No filtering if unset.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pinecone-retriever-score-threshold",
            env = "PINECONE_RETRIEVER_SCORE_THRESHOLD"
        )
    )]
    pub score_threshold: Option<f64>,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            field: default_field(),
            top_k: DEFAULT_TOP_K,
            score_threshold: None,
        }
    }
}

impl RetrieverConfig {
    /// Create a new configuration builder
    pub fn builder() -> RetrieverConfigBuilder {
        RetrieverConfigBuilder::default()
    }

    /// Checks a configuration that did not go through the builder.
    pub fn validate(&self) -> Result<()> {
        check_field(&self.field).map_err(Error::invalid_config)?;
        if self.top_k == 0 {
            return Err(Error::invalid_config("Top k must be greater than 0"));
        }
        if self.score_threshold.is_some_and(f64::is_nan) {
            return Err(Error::invalid_config("Score threshold must be a number"));
        }
        Ok(())
    }
}

impl RetrieverConfigBuilder {
    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(field) = &self.field {
            check_field(field)?;
        }

        if let Some(top_k) = &self.top_k {
            if *top_k == 0 {
                return Err("Top k must be greater than 0".to_string());
            }
        }

        if let Some(Some(threshold)) = &self.score_threshold {
            if threshold.is_nan() {
                return Err("Score threshold must be a number".to_string());
            }
        }

        Ok(())
    }
}

impl From<RetrieverConfigBuilderError> for Error {
    fn from(err: RetrieverConfigBuilderError) -> Self {
        Self::invalid_config(err.to_string())
    }
}
