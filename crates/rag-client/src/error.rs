use ragbench_core::Error as CoreError;
use thiserror::Error;

/// Errors raised while talking to the RAG service under test
#[derive(Error, Debug)]
pub enum RagClientError {
    #[error("Failed to create HTTP client: {0}")]
    ClientInit(String),

    #[error("Request to RAG service failed: {0}")]
    Request(String),

    #[error("RAG service returned {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Failed to parse RAG service response: {0}")]
    InvalidResponse(String),
}

impl From<RagClientError> for CoreError {
    fn from(err: RagClientError) -> Self {
        CoreError::rag_service(err.to_string())
    }
}
