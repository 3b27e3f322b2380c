//! Callback handlers and run-info propagation.
//!
//! Components report their lifecycle (start, end, error) to the handlers
//! registered on the [`Context`] they receive. The context also carries the
//! [`RunInfo`] of the component being run, which a caller attaches with
//! [`reuse_handlers`] before invoking a nested component.

use std::error::Error as StdError;

use crate::TRACING_TARGET;
use crate::component::{Component, RunInfo};
use crate::context::Context;
use crate::document::Document;

/// Payload reported when a component starts.
#[derive(Debug, Clone, Copy)]
pub enum CallbackInput<'a> {
    /// Texts about to be embedded.
    Embedding { texts: &'a [String] },
    /// Documents about to be stored.
    Indexer { documents: &'a [Document] },
    /// Query about to be run.
    Retriever { query: &'a str, top_k: usize },
}

/// Payload reported when a component finishes.
#[derive(Debug, Clone, Copy)]
pub enum CallbackOutput<'a> {
    /// Vectors produced by an embedder.
    Embedding { vectors: &'a [Vec<f64>] },
    /// Ids of stored documents.
    Indexer { ids: &'a [String] },
    /// Retrieved documents.
    Retriever { documents: &'a [Document] },
}

/// Receives component lifecycle events.
///
/// All methods default to no-ops so handlers implement only what they need.
pub trait Handler: Send + Sync {
    /// Called before a component does its work.
    fn on_start(&self, _info: &RunInfo, _input: &CallbackInput<'_>) {}

    /// Called after a component finished successfully.
    fn on_end(&self, _info: &RunInfo, _output: &CallbackOutput<'_>) {}

    /// Called when a component failed.
    fn on_error(&self, _info: &RunInfo, _error: &(dyn StdError + 'static)) {}
}

/// Returns a context with the same handlers as `ctx`, tagged with `run_info`.
pub fn reuse_handlers(ctx: &Context, run_info: RunInfo) -> Context {
    ctx.derive(run_info)
}

/// Returns `ctx` unchanged if it already carries run info, otherwise a
/// context tagged for the given component.
pub fn ensure_run_info(ctx: &Context, type_name: Option<&str>, component: Component) -> Context {
    if ctx.run_info().is_some() {
        return ctx.clone();
    }

    reuse_handlers(ctx, RunInfo::new(component, type_name))
}

/// Notifies every handler that the tagged component started.
pub fn on_start(ctx: &Context, input: &CallbackInput<'_>) {
    let Some(info) = ctx.run_info() else {
        return;
    };

    tracing::trace!(target: TRACING_TARGET, run = %info.name, "Component started");
    for handler in ctx.handlers() {
        handler.on_start(info, input);
    }
}

/// Notifies every handler that the tagged component finished.
pub fn on_end(ctx: &Context, output: &CallbackOutput<'_>) {
    let Some(info) = ctx.run_info() else {
        return;
    };

    tracing::trace!(target: TRACING_TARGET, run = %info.name, "Component finished");
    for handler in ctx.handlers() {
        handler.on_end(info, output);
    }
}

/// Notifies every handler that the tagged component failed.
pub fn on_error(ctx: &Context, error: &(dyn StdError + 'static)) {
    let Some(info) = ctx.run_info() else {
        return;
    };

    tracing::trace!(target: TRACING_TARGET, run = %info.name, error = %error, "Component failed");
    for handler in ctx.handlers() {
        handler.on_error(info, error);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    struct Events(Mutex<Vec<String>>);

    impl Events {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    impl Handler for Events {
        fn on_start(&self, info: &RunInfo, _input: &CallbackInput<'_>) {
            self.0.lock().unwrap().push(format!("start:{}", info.name));
        }

        fn on_end(&self, info: &RunInfo, _output: &CallbackOutput<'_>) {
            self.0.lock().unwrap().push(format!("end:{}", info.name));
        }

        fn on_error(&self, info: &RunInfo, error: &(dyn StdError + 'static)) {
            self.0.lock().unwrap().push(format!("error:{}:{error}", info.name));
        }
    }

    #[test]
    fn test_reuse_handlers_keeps_parent_untouched() {
        let events = Arc::new(Events::default());
        let ctx = Context::with_handlers([events.clone() as Arc<dyn Handler>]);

        let tagged = reuse_handlers(&ctx, RunInfo::new(Component::Embedding, Some("Fake")));
        assert!(ctx.run_info().is_none());
        assert_eq!(tagged.run_info().unwrap().name, "FakeEmbedding");
        assert_eq!(tagged.handlers().len(), 1);
    }

    #[test]
    fn test_events_reach_handlers() {
        let events = Arc::new(Events::default());
        let ctx = Context::with_handlers([events.clone() as Arc<dyn Handler>]);
        let ctx = reuse_handlers(&ctx, RunInfo::new(Component::Retriever, Some("Pinecone")));

        on_start(&ctx, &CallbackInput::Retriever { query: "q", top_k: 3 });
        on_end(&ctx, &CallbackOutput::Retriever { documents: &[] });
        on_error(&ctx, &std::io::Error::other("boom"));

        assert_eq!(
            events.take(),
            vec![
                "start:PineconeRetriever",
                "end:PineconeRetriever",
                "error:PineconeRetriever:boom",
            ]
        );
    }

    #[test]
    fn test_events_without_run_info_are_dropped() {
        let events = Arc::new(Events::default());
        let ctx = Context::with_handlers([events.clone() as Arc<dyn Handler>]);

        on_start(&ctx, &CallbackInput::Embedding { texts: &[] });
        assert!(events.take().is_empty());
    }

    #[test]
    fn test_ensure_run_info() {
        let ctx = Context::new();
        let tagged = ensure_run_info(&ctx, Some("Pinecone"), Component::Indexer);
        assert_eq!(tagged.run_info().unwrap().name, "PineconeIndexer");

        let outer = reuse_handlers(&ctx, RunInfo::new(Component::Retriever, Some("Search")));
        let kept = ensure_run_info(&outer, Some("Pinecone"), Component::Indexer);
        assert_eq!(kept.run_info().unwrap().name, "SearchRetriever");
    }
}
