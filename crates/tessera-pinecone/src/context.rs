//! Run tagging for nested embedding calls.

use tessera_core::callbacks;
use tessera_core::{Component, Context, Embedder, RunInfo};

/// Derives the context handed to `embedder`.
///
/// The derived context keeps the caller's handlers and carries a run named
/// after the embedder's declared type followed by `Embedding`, or just
/// `Embedding` when the embedder declares no type.
pub fn make_embedding_context(ctx: &Context, embedder: &dyn Embedder) -> Context {
    let run_info = RunInfo::new(Component::Embedding, embedder.component_type());
    callbacks::reuse_handlers(ctx, run_info)
}
