//! Conversion between framework data and Pinecone records.
//!
//! Each direction is a trait so callers can swap in their own mapping. Plain
//! functions and closures with the matching signature implement the traits.

use serde_json::Value;
use tessera_core::Document;

use crate::error::{Error, Result};
use crate::metadata;
use crate::record::Record;

/// Turns an embedder's `f64` vector into the `f32` values Pinecone stores.
pub trait VectorConverter: Send + Sync {
    /// Converts one vector.
    fn convert(&self, vector: &[f64]) -> Result<Vec<f32>>;
}

/// Turns a stored record into a document.
pub trait DocumentConverter: Send + Sync {
    /// Converts one record, reading the content from metadata field `field`.
    fn convert(&self, record: &Record, field: &str) -> Result<Document>;
}

/// Turns a document and its converted vector into a record to upsert.
pub trait RecordConverter: Send + Sync {
    /// Converts one document, writing the content to metadata field `field`.
    fn convert(&self, document: &Document, values: Vec<f32>, field: &str) -> Result<Record>;
}

impl<F> VectorConverter for F
where
    F: Fn(&[f64]) -> Result<Vec<f32>> + Send + Sync,
{
    fn convert(&self, vector: &[f64]) -> Result<Vec<f32>> {
        self(vector)
    }
}

impl<F> DocumentConverter for F
where
    F: Fn(&Record, &str) -> Result<Document> + Send + Sync,
{
    fn convert(&self, record: &Record, field: &str) -> Result<Document> {
        self(record, field)
    }
}

impl<F> RecordConverter for F
where
    F: Fn(&Document, Vec<f32>, &str) -> Result<Record> + Send + Sync,
{
    fn convert(&self, document: &Document, values: Vec<f32>, field: &str) -> Result<Record> {
        self(document, values, field)
    }
}

/// Narrows every element to `f32`, keeping order and length.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultVectorConverter;

impl VectorConverter for DefaultVectorConverter {
    fn convert(&self, vector: &[f64]) -> Result<Vec<f32>> {
        Ok(narrow_vector(vector))
    }
}

/// Takes the content from one metadata field and keeps the rest as metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDocumentConverter;

impl DocumentConverter for DefaultDocumentConverter {
    fn convert(&self, record: &Record, field: &str) -> Result<Document> {
        record_to_document(record, field)
    }
}

/// Stores the content in one metadata field next to the document metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRecordConverter;

impl RecordConverter for DefaultRecordConverter {
    fn convert(&self, document: &Document, values: Vec<f32>, field: &str) -> Result<Record> {
        document_to_record(document, values, field)
    }
}

/// Narrows a `f64` vector to `f32`. Precision loss is accepted.
pub fn narrow_vector(vector: &[f64]) -> Vec<f32> {
    vector.iter().map(|&value| value as f32).collect()
}

/// Builds a document from a record whose content lives in metadata `field`.
///
/// Fails if `field` is absent or does not hold a string. Every other
/// metadata entry is carried over unchanged.
pub fn record_to_document(record: &Record, field: &str) -> Result<Document> {
    let mut data = record.metadata_map();

    let content = match data.remove(field) {
        None => return Err(Error::missing_content_field(field)),
        Some(Value::String(content)) => content,
        Some(other) => return Err(Error::content_field_type(field, metadata::kind_name(&other))),
    };

    Ok(Document::new(record.id.clone(), content).with_metadata(data))
}

/// Builds a record from a document, storing the content in metadata `field`.
///
/// A metadata entry already named `field` is overwritten by the content.
pub fn document_to_record(document: &Document, values: Vec<f32>, field: &str) -> Result<Record> {
    if document.id.is_empty() {
        return Err(Error::EmptyDocumentId);
    }

    let mut data = document.metadata.clone();
    data.insert(field.to_owned(), Value::String(document.content.clone()));

    Ok(Record::new(document.id.clone(), values).with_metadata(&data))
}
