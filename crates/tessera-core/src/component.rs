//! Component kinds and run descriptors.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};

/// Logical role a component plays in a pipeline.
///
/// The string form is the tag appended to a component's type name to build
/// its run name, e.g. `"Pinecone" + "Retriever"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, IntoStaticStr,
)]
pub enum Component {
    /// Converts text into numeric vectors.
    Embedding,
    /// Stores documents into a backing store.
    Indexer,
    /// Fetches documents relevant to a query.
    Retriever,
}

/// Describes the component currently running, for callback handlers.
///
/// Attached to a [`Context`](crate::Context) for the duration of one call and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    /// Display name, `type_name` followed by the component tag.
    pub name: String,
    /// Implementation type, empty when the component does not declare one.
    pub type_name: String,
    /// Role of the component.
    pub component: Component,
}

impl RunInfo {
    /// Creates a run descriptor, deriving the display name.
    ///
    /// Without a type name the display name is just the component tag.
    pub fn new(component: Component, type_name: Option<&str>) -> Self {
        let type_name = type_name.unwrap_or_default().to_owned();
        let name = format!("{type_name}{component}");

        Self {
            name,
            type_name,
            component,
        }
    }

    /// Overrides the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
