//! Embedding generation for answer relevancy scoring
//!
//! Embeddings are requested from an OpenAI-compatible endpoint (vLLM, TEI,
//! OpenAI) or produced by a deterministic mock for offline runs.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use ragbench_core::error::{Result, ResultExt};
use std::sync::Arc;

mod api_provider;
pub mod config;
pub mod error;
mod mock_provider;
pub mod provider;

pub use api_provider::create_api_provider;
pub use config::{EmbeddingConfig, EmbeddingConfigBuilder, EmbeddingProviderType};
pub use error::EmbeddingError;
pub use mock_provider::MockEmbeddingProvider;
pub use provider::EmbeddingProvider;

/// Parse a provider name from configuration
fn parse_provider_type(provider: &str) -> std::result::Result<EmbeddingProviderType, EmbeddingError> {
    match provider.to_lowercase().as_str() {
        "localapi" | "api" => Ok(EmbeddingProviderType::LocalApi),
        "mock" => Ok(EmbeddingProviderType::Mock),
        other => Err(EmbeddingError::UnsupportedProvider(other.to_string())),
    }
}

/// Create an embedding manager from the application's EmbeddingsConfig
///
/// Reads the API key from the EMBEDDING_API_KEY environment variable when the
/// config does not set one.
pub fn create_embedding_manager_from_app_config(
    embeddings_config: &ragbench_core::config::EmbeddingsConfig,
) -> Result<Arc<EmbeddingManager>> {
    let mut config_builder = EmbeddingConfigBuilder::default()
        .provider(parse_provider_type(&embeddings_config.provider)?)
        .model(embeddings_config.model.clone())
        .texts_per_api_request(embeddings_config.texts_per_api_request)
        .embedding_dimension(embeddings_config.embedding_dimension)
        .retry_attempts(embeddings_config.retry_attempts);

    if let Some(ref api_base_url) = embeddings_config.api_base_url {
        config_builder = config_builder.api_base_url(api_base_url.clone());
    }

    let api_key = embeddings_config
        .api_key
        .clone()
        .or_else(|| std::env::var("EMBEDDING_API_KEY").ok());
    if let Some(key) = api_key {
        config_builder = config_builder.api_key(key);
    }

    let embedding_manager = EmbeddingManager::from_config(config_builder.build())
        .context("Failed to create embedding manager")?;

    Ok(Arc::new(embedding_manager))
}

/// Manager for handling embedding generation with immutable configuration
pub struct EmbeddingManager {
    provider: Arc<dyn EmbeddingProvider>,
    model_version: String,
}

impl EmbeddingManager {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model_version: String) -> Self {
        Self {
            provider,
            model_version,
        }
    }

    /// Initialize manager from configuration
    pub fn from_config(config: EmbeddingConfig) -> std::result::Result<Self, EmbeddingError> {
        let model_version = config.model.clone();

        let provider: Arc<dyn EmbeddingProvider> = match config.provider {
            EmbeddingProviderType::LocalApi => {
                let provider = api_provider::OpenAiApiProvider::new(config)
                    .map_err(|e| EmbeddingError::ClientInitError(e.to_string()))?;
                Arc::new(provider)
            }
            EmbeddingProviderType::Mock => {
                Arc::new(MockEmbeddingProvider::new(config.embedding_dimension))
            }
        };

        Ok(Self {
            provider,
            model_version,
        })
    }

    /// Get reference to the embedding provider
    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Generate embeddings for texts
    pub async fn embed(&self, texts: Vec<String>) -> Result<Vec<Option<Vec<f32>>>> {
        self.provider.embed(texts).await
    }
}

/// Cosine similarity of two vectors. Zero vectors have similarity 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragbench_core::config::EmbeddingsConfig;

    fn mock_config() -> EmbeddingsConfig {
        EmbeddingsConfig {
            provider: "mock".to_string(),
            model: "test-model".to_string(),
            embedding_dimension: 16,
            ..EmbeddingsConfig::default()
        }
    }

    #[tokio::test]
    async fn test_mock_manager_from_app_config() {
        let manager = create_embedding_manager_from_app_config(&mock_config()).unwrap();
        assert_eq!(manager.model_version(), "test-model");
        assert_eq!(manager.provider().embedding_dimension(), 16);

        let embeddings = manager
            .embed(vec!["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(embeddings.len(), 2);
    }

    #[test]
    fn test_api_manager_builds_without_server() {
        let config = EmbeddingsConfig {
            provider: "localapi".to_string(),
            api_key: Some("config-api-key".to_string()),
            ..EmbeddingsConfig::default()
        };
        assert!(create_embedding_manager_from_app_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = EmbeddingsConfig {
            provider: "candle".to_string(),
            ..EmbeddingsConfig::default()
        };
        let err = create_embedding_manager_from_app_config(&config)
            .err()
            .unwrap()
            .to_string();
        assert!(err.contains("Unsupported embedding provider: candle"));
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
