//! Embedding component trait.

use crate::context::Context;
use crate::error::Result;

/// Converts text into numeric vectors.
///
/// Implementations receive the caller's [`Context`] and should report their
/// lifecycle through [`callbacks`](crate::callbacks) so handlers see the run
/// the caller tagged.
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds each text into one vector, in input order.
    async fn embed_strings(&self, ctx: &Context, texts: &[String]) -> Result<Vec<Vec<f64>>>;

    /// Declared implementation type, e.g. `"OpenAI"`.
    ///
    /// Returns `None` when the implementation does not declare one.
    fn component_type(&self) -> Option<&str> {
        None
    }
}
