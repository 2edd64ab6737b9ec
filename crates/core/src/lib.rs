//! Core types for the ragbench RAG benchmarking service
//!
//! This crate provides the foundational pieces shared by every other crate:
//!
//! - **Models**: test cases, evaluation samples and benchmark results
//! - **Configuration**: layered configuration loading and validation
//! - **Error handling**: unified error types
//!

pub mod config;
pub mod error;
pub mod models;

// Re-export main types for convenience
pub use config::{
    Config, EmbeddingsConfig, EvaluationConfig, LlmConfig, RagServiceConfig, ServerConfig,
    StorageConfig,
};
pub use error::{Error, Result, ResultExt};
pub use models::{EvaluationSample, MetricName, MetricScores, TestCase, TestResult};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, ResultExt};
    pub use crate::models::{EvaluationSample, TestCase, TestResult};
}
