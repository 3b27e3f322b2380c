//! Immutable execution context carried through component calls.

use std::fmt;
use std::sync::Arc;

use crate::callbacks::Handler;
use crate::component::RunInfo;

/// Execution context passed to every component call.
///
/// A context is never mutated in place. Attaching run info produces a derived
/// context that shares the parent's handlers, so concurrent calls can tag
/// their own copies without coordination.
#[derive(Clone)]
pub struct Context {
    handlers: Arc<[Arc<dyn Handler>]>,
    run_info: Option<Arc<RunInfo>>,
}

impl Context {
    /// Creates an empty context with no handlers and no run info.
    pub fn new() -> Self {
        Self {
            handlers: Arc::from(Vec::new()),
            run_info: None,
        }
    }

    /// Creates a context that reports to the given handlers.
    pub fn with_handlers(handlers: impl IntoIterator<Item = Arc<dyn Handler>>) -> Self {
        Self {
            handlers: handlers.into_iter().collect(),
            run_info: None,
        }
    }

    /// Returns a derived context carrying `run_info` and the same handlers.
    pub(crate) fn derive(&self, run_info: RunInfo) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            run_info: Some(Arc::new(run_info)),
        }
    }

    /// Returns the run info of the component currently executing.
    pub fn run_info(&self) -> Option<&RunInfo> {
        self.run_info.as_deref()
    }

    /// Returns the registered callback handlers.
    pub fn handlers(&self) -> &[Arc<dyn Handler>] {
        &self.handlers
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("handlers", &self.handlers.len())
            .field("run_info", &self.run_info)
            .finish()
    }
}
