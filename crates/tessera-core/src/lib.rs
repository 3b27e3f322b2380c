#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod callbacks;
mod component;
mod context;
mod document;
mod embedding;
mod error;
mod indexer;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
mod retriever;

pub use component::{Component, RunInfo};
pub use context::Context;
pub use document::{DENSE_VECTOR_KEY, Document, Metadata, SCORE_KEY};
pub use embedding::Embedder;
pub use error::{BoxedError, Error, Result};
pub use indexer::Indexer;
pub use retriever::{RetrieveOptions, Retriever};

/// Tracing target for the component model.
pub const TRACING_TARGET: &str = "tessera_core";
