use thiserror::Error;

/// Result type for ragbench operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ragbench operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Vector store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Embedding generation errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Errors talking to the RAG microservice
    #[error("RAG service error: {0}")]
    RagService(String),

    /// Metric evaluation errors
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Creates an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Creates a RAG service error
    pub fn rag_service(msg: impl Into<String>) -> Self {
        Self::RagService(msg.into())
    }

    /// Creates an evaluation error
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err: Result<()> = Err::<(), _>(io).context("Failed to read tests");
        let message = err.unwrap_err().to_string();
        assert_eq!(message, "Failed to read tests: missing file");
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            Error::rag_service("timeout").to_string(),
            "RAG service error: timeout"
        );
        assert_eq!(
            Error::storage("scroll failed").to_string(),
            "Storage error: scroll failed"
        );
    }
}
