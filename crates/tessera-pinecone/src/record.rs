//! Pinecone record types.
//!
//! [`Record`] and [`ScoredRecord`] carry the dense part of the SDK's
//! [`Vector`] and query matches and convert from them, so an index backed by
//! the Pinecone client can hand its results straight to the retriever.

use pinecone_sdk::models::{QueryResponse, Vector};
use prost_types::Struct;
use tessera_core::Metadata;

use crate::metadata;

/// A vector stored in a Pinecone index.
///
/// Mirrors the wire shape of a Pinecone vector: dense `f32` values and
/// optional protobuf metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Unique identifier for the vector.
    pub id: String,
    /// Dense embedding values.
    pub values: Vec<f32>,
    /// Protobuf metadata, absent when the vector has none.
    pub metadata: Option<Struct>,
}

impl Record {
    /// Creates a record with an id and values and no metadata.
    pub fn new(id: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            values,
            metadata: None,
        }
    }

    /// Sets the metadata from a generic key/value map.
    pub fn with_metadata(mut self, metadata: &Metadata) -> Self {
        self.metadata = Some(metadata::to_struct(metadata));
        self
    }

    /// Reads the metadata as a generic key/value map.
    ///
    /// A record without metadata reads as an empty map.
    pub fn metadata_map(&self) -> Metadata {
        self.metadata
            .as_ref()
            .map(metadata::to_map)
            .unwrap_or_default()
    }
}

/// A record returned by a similarity query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    /// The matched record. `values` is empty unless values were requested.
    pub record: Record,
    /// Similarity score under the index metric.
    pub score: f32,
}

impl ScoredRecord {
    /// Creates a scored record.
    pub fn new(record: Record, score: f32) -> Self {
        Self { record, score }
    }

    /// Converts the matches of an SDK query response, keeping their order.
    ///
    /// Sparse values are dropped.
    pub fn from_query_response(response: QueryResponse) -> Vec<Self> {
        response
            .matches
            .into_iter()
            .map(|scored| {
                let record = Record {
                    id: scored.id,
                    values: scored.values,
                    metadata: scored.metadata,
                };
                Self::new(record, scored.score)
            })
            .collect()
    }
}

/// Sparse values are dropped; the adapter only stores dense vectors.
impl From<Vector> for Record {
    fn from(vector: Vector) -> Self {
        Self {
            id: vector.id,
            values: vector.values,
            metadata: vector.metadata,
        }
    }
}

impl From<Record> for Vector {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            values: record.values,
            sparse_values: None,
            metadata: record.metadata,
        }
    }
}
