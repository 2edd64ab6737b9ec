//! Configuration module for the ragbench service
//!
//! This module provides configuration structures and loading mechanisms.
//! Configuration can be loaded from TOML files, a `.env` file and/or
//! environment variables.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub use defaults::SUPPORTED_METRICS;

use defaults::*;

/// Main configuration structure for the ragbench service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// RAG microservice under test
    #[serde(default)]
    pub rag_service: RagServiceConfig,

    /// Vector store holding the retrieved documents
    #[serde(default)]
    pub storage: StorageConfig,

    /// Judge LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Embeddings configuration (used by answer relevancy)
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    /// Metric selection and evaluation limits
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// REST server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Allowed CORS origins. Empty disables CORS, `*` allows everything.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Connection settings for the RAG microservice being benchmarked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagServiceConfig {
    #[serde(default = "default_rag_host")]
    pub host: String,

    #[serde(default = "default_rag_port")]
    pub port: u16,

    /// Path of the question endpoint
    #[serde(default = "default_rag_path")]
    pub path: String,

    /// Form field carrying the query
    #[serde(default = "default_rag_message_field")]
    pub message_field: String,

    /// Request timeout in seconds
    #[serde(default = "default_rag_timeout_secs")]
    pub timeout_secs: u64,
}

impl RagServiceConfig {
    /// Full URL of the question endpoint
    pub fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        format!("http://{}:{}{}", self.host, self.port, path)
    }
}

impl Default for RagServiceConfig {
    fn default() -> Self {
        Self {
            host: default_rag_host(),
            port: default_rag_port(),
            path: default_rag_path(),
            message_field: default_rag_message_field(),
            timeout_secs: default_rag_timeout_secs(),
        }
    }
}

/// Vector store configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Provider type: "qdrant" (default), "mock"
    #[serde(default = "default_storage_provider")]
    pub provider: String,

    #[serde(default = "default_qdrant_host")]
    pub qdrant_host: String,

    /// Qdrant gRPC port
    #[serde(default = "default_qdrant_port")]
    pub qdrant_port: u16,

    /// API key for Qdrant Cloud
    #[serde(default)]
    pub api_key: Option<String>,

    /// Collection holding the documents indexed by the RAG service
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Payload field holding the document source URL
    #[serde(default = "default_url_field")]
    pub url_field: String,

    /// Payload field holding the document text
    #[serde(default = "default_content_field")]
    pub content_field: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_storage_timeout_ms")]
    pub timeout_ms: u64,
}

impl StorageConfig {
    pub fn qdrant_url(&self) -> String {
        format!("http://{}:{}", self.qdrant_host, self.qdrant_port)
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("provider", &self.provider)
            .field("qdrant_host", &self.qdrant_host)
            .field("qdrant_port", &self.qdrant_port)
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .field("collection_name", &self.collection_name)
            .field("url_field", &self.url_field)
            .field("content_field", &self.content_field)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_storage_provider(),
            qdrant_host: default_qdrant_host(),
            qdrant_port: default_qdrant_port(),
            api_key: None,
            collection_name: default_collection_name(),
            url_field: default_url_field(),
            content_field: default_content_field(),
            timeout_ms: default_storage_timeout_ms(),
        }
    }
}

/// Judge LLM configuration
///
/// # Providers
/// - `openai` (default): any OpenAI-compatible chat completions gateway (OpenRouter by default)
/// - `mock`: canned answers for testing
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_llm_api_base_url")]
    pub api_base_url: String,

    /// API key (or use the OPENROUTER_API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of retry attempts for failed or unparsable completions
    #[serde(default = "default_llm_retry_attempts")]
    pub retry_attempts: usize,

    /// Maximum concurrent completion requests
    #[serde(default = "default_llm_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

impl LlmConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("retry_attempts", &self.retry_attempts)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            api_base_url: default_llm_api_base_url(),
            api_key: None,
            temperature: 0.0,
            timeout_secs: default_llm_timeout_secs(),
            retry_attempts: default_llm_retry_attempts(),
            max_concurrent_requests: default_llm_max_concurrent_requests(),
        }
    }
}

/// Configuration for embeddings generation
///
/// # Providers
/// - `localapi` (default): vLLM, TEI or any OpenAI-compatible embeddings API
/// - `mock`: Mock provider for testing
#[derive(Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    #[serde(default = "default_embeddings_provider")]
    pub provider: String,

    #[serde(default = "default_embeddings_model")]
    pub model: String,

    #[serde(default = "default_embeddings_api_base_url")]
    pub api_base_url: Option<String>,

    /// API key for authentication (or use EMBEDDING_API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Number of texts sent in a single embedding API request
    #[serde(default = "default_texts_per_api_request")]
    pub texts_per_api_request: usize,

    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Number of retry attempts for failed embedding requests
    #[serde(default = "default_embedding_retry_attempts")]
    pub retry_attempts: usize,
}

impl std::fmt::Debug for EmbeddingsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingsConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .field("texts_per_api_request", &self.texts_per_api_request)
            .field("embedding_dimension", &self.embedding_dimension)
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_embeddings_provider(),
            model: default_embeddings_model(),
            api_base_url: default_embeddings_api_base_url(),
            api_key: None,
            texts_per_api_request: default_texts_per_api_request(),
            embedding_dimension: default_embedding_dimension(),
            retry_attempts: default_embedding_retry_attempts(),
        }
    }
}

/// Metric selection and evaluation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Metrics computed for every sample
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,

    /// Number of questions generated per answer for answer relevancy
    #[serde(default = "default_answer_relevancy_strictness")]
    pub answer_relevancy_strictness: usize,

    /// Samples scored concurrently
    #[serde(default = "default_max_concurrent_samples")]
    pub max_concurrent_samples: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
            answer_relevancy_strictness: default_answer_relevancy_strictness(),
            max_concurrent_samples: default_max_concurrent_samples(),
        }
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("Invalid server port: 0"));
        }

        if self.rag_service.host.trim().is_empty() {
            return Err(Error::config("RAG service host must not be empty"));
        }
        if self.rag_service.port == 0 {
            return Err(Error::config("Invalid RAG service port: 0"));
        }
        if self.rag_service.timeout_secs == 0 {
            return Err(Error::config(
                "rag_service.timeout_secs must be greater than 0",
            ));
        }
        if self.rag_service.message_field.trim().is_empty() {
            return Err(Error::config("RAG service message field must not be empty"));
        }

        if !["qdrant", "mock"].contains(&self.storage.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid storage provider: {}. Must be one of: qdrant, mock",
                self.storage.provider
            )));
        }
        if self.storage.collection_name.trim().is_empty() {
            return Err(Error::config("Qdrant collection name must not be empty"));
        }
        if self.storage.qdrant_port == 0 {
            return Err(Error::config("Invalid Qdrant port: 0"));
        }

        if !["openai", "mock"].contains(&self.llm.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid LLM provider: {}. Must be one of: openai, mock",
                self.llm.provider
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(Error::config("LLM model name must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::config(format!(
                "Invalid LLM temperature: {}. Must be between 0.0 and 2.0",
                self.llm.temperature
            )));
        }
        if self.llm.max_concurrent_requests == 0 {
            return Err(Error::config(
                "llm.max_concurrent_requests must be greater than 0",
            ));
        }

        if !["localapi", "api", "mock"].contains(&self.embeddings.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid embeddings provider: {}. Must be one of: localapi, mock",
                self.embeddings.provider
            )));
        }
        if self.embeddings.model.trim().is_empty() {
            return Err(Error::config("Embeddings model name must not be empty"));
        }
        if self.embeddings.texts_per_api_request == 0 {
            return Err(Error::config(
                "embeddings.texts_per_api_request must be greater than 0",
            ));
        }

        if self.evaluation.metrics.is_empty() {
            return Err(Error::config("At least one evaluation metric is required"));
        }
        for (i, metric) in self.evaluation.metrics.iter().enumerate() {
            if self.evaluation.metrics[..i].contains(metric) {
                return Err(Error::config(format!("Duplicate metric: {metric}")));
            }
            if !SUPPORTED_METRICS.contains(&metric.as_str()) {
                return Err(Error::config(format!(
                    "Unknown metric: {metric}. Supported metrics: {}",
                    SUPPORTED_METRICS.join(", ")
                )));
            }
        }
        if self.evaluation.answer_relevancy_strictness == 0 {
            return Err(Error::config(
                "evaluation.answer_relevancy_strictness must be greater than 0",
            ));
        }
        if self.evaluation.max_concurrent_samples == 0 {
            return Err(Error::config(
                "evaluation.max_concurrent_samples must be greater than 0",
            ));
        }

        Ok(())
    }
}
