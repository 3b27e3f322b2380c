//! Test doubles for components and callback handlers.
//!
//! Only available with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! tessera-core = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::{Mutex, MutexGuard};

use crate::callbacks::{self, CallbackInput, CallbackOutput, Handler};
use crate::component::RunInfo;
use crate::context::Context;
use crate::embedding::Embedder;
use crate::error::{Error, Result};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Deterministic embedder that records the run it was called under.
///
/// Texts registered with [`MockEmbedder::with_vector`] embed to the given
/// vector; every other text embeds to a vector derived from its bytes.
#[derive(Debug, Default)]
pub struct MockEmbedder {
    dimensions: usize,
    type_name: Option<String>,
    fixed: HashMap<String, Vec<f64>>,
    failure: Option<String>,
    runs: Mutex<Vec<Option<String>>>,
}

impl MockEmbedder {
    /// Creates an embedder producing vectors of the given size.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    /// Declares the implementation type reported by `component_type`.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Pins the vector returned for `text`.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f64>) -> Self {
        self.fixed.insert(text.into(), vector);
        self
    }

    /// Makes every call fail with an embedding error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Run names observed on each call, `None` for untagged contexts.
    pub fn observed_runs(&self) -> Vec<Option<String>> {
        lock(&self.runs).clone()
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        lock(&self.runs).len()
    }

    fn vector_for(&self, text: &str) -> Vec<f64> {
        if let Some(vector) = self.fixed.get(text) {
            return vector.clone();
        }

        let seed = text
            .bytes()
            .fold(17_u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
        (0..self.dimensions as u64)
            .map(|i| (seed.wrapping_add(i.wrapping_mul(7919)) % 1000) as f64 / 1000.0)
            .collect()
    }
}

#[async_trait::async_trait]
impl Embedder for MockEmbedder {
    async fn embed_strings(&self, ctx: &Context, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        lock(&self.runs).push(ctx.run_info().map(|info| info.name.clone()));
        callbacks::on_start(ctx, &CallbackInput::Embedding { texts });

        if let Some(message) = &self.failure {
            let err = Error::embedding(message);
            callbacks::on_error(ctx, &err);
            return Err(err);
        }

        let vectors: Vec<Vec<f64>> = texts.iter().map(|text| self.vector_for(text)).collect();
        callbacks::on_end(ctx, &CallbackOutput::Embedding { vectors: &vectors });
        Ok(vectors)
    }

    fn component_type(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

/// Lifecycle phase captured by [`RecordingHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `on_start` was called.
    Start,
    /// `on_end` was called.
    End,
    /// `on_error` was called.
    Error,
}

/// Callback handler that records every event as `(run name, phase)`.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<(String, Phase)>>,
}

impl RecordingHandler {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events recorded so far.
    pub fn events(&self) -> Vec<(String, Phase)> {
        lock(&self.events).clone()
    }

    fn record(&self, info: &RunInfo, phase: Phase) {
        lock(&self.events).push((info.name.clone(), phase));
    }
}

impl Handler for RecordingHandler {
    fn on_start(&self, info: &RunInfo, _input: &CallbackInput<'_>) {
        self.record(info, Phase::Start);
    }

    fn on_end(&self, info: &RunInfo, _output: &CallbackOutput<'_>) {
        self.record(info, Phase::End);
    }

    fn on_error(&self, info: &RunInfo, _error: &(dyn StdError + 'static)) {
        self.record(info, Phase::Error);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::component::Component;

    #[tokio::test]
    async fn test_mock_embedder_is_deterministic() {
        let embedder = MockEmbedder::new(4).with_vector("pinned", vec![1.0, 0.0]);
        let ctx = Context::new();
        let texts = vec!["hello".to_owned(), "hello".to_owned(), "pinned".to_owned()];

        let vectors = embedder.embed_strings(&ctx, &texts).await.unwrap();
        assert_eq!(vectors[0].len(), 4);
        assert_eq!(vectors[0], vectors[1]);
        assert_eq!(vectors[2], vec![1.0, 0.0]);
        assert_eq!(embedder.observed_runs(), vec![None]);
    }

    #[tokio::test]
    async fn test_mock_embedder_reports_to_handlers() {
        let recorder = Arc::new(RecordingHandler::new());
        let ctx = Context::with_handlers([recorder.clone() as Arc<dyn Handler>]);
        let ctx = callbacks::reuse_handlers(&ctx, RunInfo::new(Component::Embedding, Some("Mock")));

        let embedder = MockEmbedder::new(2).with_failure("quota exceeded");
        let err = embedder.embed_strings(&ctx, &["a".to_owned()]).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
        assert_eq!(
            recorder.events(),
            vec![
                ("MockEmbedding".to_owned(), Phase::Start),
                ("MockEmbedding".to_owned(), Phase::Error),
            ]
        );
    }
}
