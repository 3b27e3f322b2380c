//! Error types for tessera-core.

use std::fmt;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for component operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by framework components.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Embedding provider failed or returned unusable output.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Provider error with the underlying cause attached.
    #[error("provider error: {provider}: {source}")]
    Provider {
        provider: String,
        #[source]
        source: BoxedError,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates an embedding error.
    pub fn embedding(message: impl fmt::Display) -> Self {
        Self::Embedding(message.to_string())
    }

    /// Creates a provider error wrapping the given source.
    pub fn provider(
        provider: impl fmt::Display,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            source: Box::new(source),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::embedding("dimension mismatch").to_string(),
            "embedding error: dimension mismatch"
        );
        assert_eq!(
            Error::config("missing model").to_string(),
            "configuration error: missing model"
        );

        let io = std::io::Error::other("connection reset");
        let err = Error::provider("openai", io);
        assert_eq!(err.to_string(), "provider error: openai: connection reset");
        assert!(std::error::Error::source(&err).is_some());
    }
}
