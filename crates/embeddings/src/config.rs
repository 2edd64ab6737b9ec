//! Configuration for embedding generation

use serde::{Deserialize, Serialize};

/// Embedding provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EmbeddingProviderType {
    /// OpenAI-compatible API (vLLM, TEI or remote)
    #[default]
    LocalApi,
    /// Mock provider for testing
    Mock,
}

/// Configuration for embedding generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub(crate) provider: EmbeddingProviderType,

    /// Model name sent with every request
    pub(crate) model: String,

    /// Texts per API request
    pub(crate) texts_per_api_request: usize,

    pub(crate) api_base_url: Option<String>,

    pub(crate) api_key: Option<String>,

    /// Expected embedding dimension
    pub(crate) embedding_dimension: usize,

    /// Maximum number of in-flight API requests
    pub(crate) max_concurrent_api_requests: usize,

    /// Retries per batch before giving up
    pub(crate) retry_attempts: usize,
}

impl EmbeddingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.texts_per_api_request == 0 {
            return Err("texts_per_api_request must be greater than 0".to_string());
        }
        if self.texts_per_api_request > 1000 {
            return Err("texts_per_api_request too large (max 1000)".to_string());
        }
        if self.max_concurrent_api_requests == 0 {
            return Err("max_concurrent_api_requests must be greater than 0".to_string());
        }
        if self.model.is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        if self.embedding_dimension == 0 {
            return Err("embedding_dimension must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::default(),
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            texts_per_api_request: 32,
            api_base_url: Some("http://localhost:8000/v1".to_string()),
            api_key: None,
            embedding_dimension: 384,
            max_concurrent_api_requests: 4,
            retry_attempts: 3,
        }
    }
}

/// Builder for EmbeddingConfig
#[derive(Default)]
pub struct EmbeddingConfigBuilder {
    provider: Option<EmbeddingProviderType>,
    model: Option<String>,
    texts_per_api_request: Option<usize>,
    api_base_url: Option<Option<String>>,
    api_key: Option<Option<String>>,
    embedding_dimension: Option<usize>,
    max_concurrent_api_requests: Option<usize>,
    retry_attempts: Option<usize>,
}

impl EmbeddingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: EmbeddingProviderType) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn texts_per_api_request(mut self, count: usize) -> Self {
        self.texts_per_api_request = Some(count);
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(Some(url.into()));
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Some(key.into()));
        self
    }

    pub fn embedding_dimension(mut self, dimension: usize) -> Self {
        self.embedding_dimension = Some(dimension);
        self
    }

    pub fn max_concurrent_api_requests(mut self, count: usize) -> Self {
        self.max_concurrent_api_requests = Some(count);
        self
    }

    pub fn retry_attempts(mut self, attempts: usize) -> Self {
        self.retry_attempts = Some(attempts);
        self
    }

    /// Build the configuration, using defaults for unset fields
    pub fn build(self) -> EmbeddingConfig {
        let defaults = EmbeddingConfig::default();

        EmbeddingConfig {
            provider: self.provider.unwrap_or(defaults.provider),
            model: self.model.unwrap_or(defaults.model),
            texts_per_api_request: self
                .texts_per_api_request
                .unwrap_or(defaults.texts_per_api_request),
            api_base_url: self.api_base_url.unwrap_or(defaults.api_base_url),
            api_key: self.api_key.unwrap_or(defaults.api_key),
            embedding_dimension: self
                .embedding_dimension
                .unwrap_or(defaults.embedding_dimension),
            max_concurrent_api_requests: self
                .max_concurrent_api_requests
                .unwrap_or(defaults.max_concurrent_api_requests),
            retry_attempts: self.retry_attempts.unwrap_or(defaults.retry_attempts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_falls_back_to_defaults() {
        let config = EmbeddingConfigBuilder::new().model("custom").build();
        assert_eq!(config.model, "custom");
        assert_eq!(config.texts_per_api_request, 32);
        assert_eq!(config.embedding_dimension, 384);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let config = EmbeddingConfigBuilder::new().texts_per_api_request(0).build();
        assert!(config.validate().is_err());
    }
}
