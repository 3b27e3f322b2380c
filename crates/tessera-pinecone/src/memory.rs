//! In-memory index for tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::TRACING_TARGET;
use crate::error::{Error, Result};
use crate::index::{PineconeIndex, QueryRequest};
use crate::metadata;
use crate::record::{Record, ScoredRecord};

/// [`PineconeIndex`] kept in process memory, scoring by cosine similarity.
///
/// Filters support plain equality (`{"lang": "en"}`) and `$eq`
/// (`{"lang": {"$eq": "en"}}`) on top-level metadata fields.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    namespaces: RwLock<HashMap<String, BTreeMap<String, Record>>>,
}

impl MemoryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the records of a namespace, ordered by id.
    pub async fn records(&self, namespace: Option<&str>) -> Vec<Record> {
        self.namespaces
            .read()
            .await
            .get(namespace.unwrap_or_default())
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PineconeIndex for MemoryIndex {
    async fn upsert(&self, namespace: Option<&str>, records: Vec<Record>) -> Result<usize> {
        let count = records.len();
        let mut namespaces = self.namespaces.write().await;
        let entries = namespaces
            .entry(namespace.unwrap_or_default().to_owned())
            .or_default();

        for record in records {
            entries.insert(record.id.clone(), record);
        }

        tracing::trace!(target: TRACING_TARGET, count = %count, "Upserted into memory index");
        Ok(count)
    }

    async fn query(&self, request: QueryRequest) -> Result<Vec<ScoredRecord>> {
        let filter = request
            .filter
            .as_ref()
            .map(metadata::to_map)
            .unwrap_or_default();

        let namespaces = self.namespaces.read().await;
        let Some(records) = namespaces.get(request.namespace.as_deref().unwrap_or_default()) else {
            return Ok(Vec::new());
        };

        let mut matches = Vec::new();
        for record in records.values() {
            if !matches_filter(&record.metadata_map(), &filter)? {
                continue;
            }

            let mut record = record.clone();
            let score = cosine_similarity(&request.vector, &record.values);
            if !request.include_values {
                record.values.clear();
            }
            if !request.include_metadata {
                record.metadata = None;
            }
            matches.push(ScoredRecord::new(record, score));
        }

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(request.top_k);
        Ok(matches)
    }
}

fn matches_filter(metadata: &tessera_core::Metadata, filter: &tessera_core::Metadata) -> Result<bool> {
    for (key, condition) in filter {
        let expected = match condition {
            Value::Object(operators) => match operators.get("$eq") {
                Some(expected) if operators.len() == 1 => expected,
                _ => {
                    return Err(Error::invalid_filter(format!(
                        "unsupported condition on field {key}"
                    )));
                }
            },
            expected => expected,
        };

        if metadata.get(key) != Some(expected) {
            return Ok(false);
        }
    }

    Ok(true)
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
