//! Error types for metric evaluation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Invalid judge output: {0}")]
    InvalidJudgeOutput(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

pub type Result<T> = std::result::Result<T, EvaluationError>;

impl From<EvaluationError> for ragbench_core::Error {
    fn from(err: EvaluationError) -> Self {
        ragbench_core::Error::evaluation(err.to_string())
    }
}
