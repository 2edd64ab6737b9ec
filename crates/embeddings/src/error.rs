//! Error types for the embeddings module

use std::fmt;

/// Errors that can occur during embedding operations
#[derive(Debug)]
pub enum EmbeddingError {
    /// Client setup failed
    ClientInitError(String),

    /// Inference failed
    InferenceError(String),

    /// Returned vector has an unexpected size
    DimensionMismatch { expected: usize, actual: usize },

    /// Unsupported provider
    UnsupportedProvider(String),

    /// Configuration error
    ConfigError(String),
}

impl fmt::Display for EmbeddingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientInitError(msg) => write!(f, "Failed to initialize client: {msg}"),
            Self::InferenceError(msg) => write!(f, "Inference failed: {msg}"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            Self::UnsupportedProvider(provider) => {
                write!(f, "Unsupported embedding provider: {provider}")
            }
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for EmbeddingError {}

impl From<EmbeddingError> for ragbench_core::Error {
    fn from(err: EmbeddingError) -> Self {
        ragbench_core::Error::Embedding(err.to_string())
    }
}
