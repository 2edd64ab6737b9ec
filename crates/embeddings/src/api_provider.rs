//! OpenAI-compatible API provider for embeddings (vLLM, TEI, OpenAI, etc.)

use crate::{config::EmbeddingConfig, error::EmbeddingError, provider::EmbeddingProvider};
use async_openai::types::{CreateEmbeddingRequest, EmbeddingInput};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use ragbench_core::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// OpenAI-compatible API provider
pub struct OpenAiApiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
    batch_size: usize,
    max_concurrent: usize,
    concurrency_limiter: Arc<Semaphore>,
    retry_attempts: usize,
}

impl OpenAiApiProvider {
    /// Create a new API provider from configuration
    pub(crate) fn new(config: EmbeddingConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| EmbeddingError::ConfigError(format!("Invalid configuration: {e}")))?;

        let base_url = config
            .api_base_url
            .clone()
            .unwrap_or_else(|| "http://localhost:8000/v1".to_string());

        info!("Initializing OpenAI-compatible API embeddings");
        info!("  Model: {}", config.model);
        info!("  Dimensions: {}", config.embedding_dimension);
        info!("  Batch size: {}", config.texts_per_api_request);
        info!("  Base URL: {base_url}");

        let mut openai_config = OpenAIConfig::new().with_api_base(&base_url);
        if let Some(ref api_key) = config.api_key {
            openai_config = openai_config.with_api_key(api_key);
        }

        Ok(Self {
            client: Client::with_config(openai_config),
            model: config.model,
            dimensions: config.embedding_dimension,
            batch_size: config.texts_per_api_request,
            max_concurrent: config.max_concurrent_api_requests,
            concurrency_limiter: Arc::new(Semaphore::new(config.max_concurrent_api_requests)),
            retry_attempts: config.retry_attempts,
        })
    }

    /// Embed one batch, retrying with exponential backoff
    async fn embed_batch(
        &self,
        texts: Vec<String>,
    ) -> std::result::Result<Vec<Vec<f32>>, EmbeddingError> {
        let _permit = self
            .concurrency_limiter
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| {
                EmbeddingError::InferenceError(format!("Failed to acquire concurrency permit: {e}"))
            })?;

        let mut attempt = 0;
        loop {
            let request = CreateEmbeddingRequest {
                model: self.model.clone(),
                input: EmbeddingInput::StringArray(texts.clone()),
                encoding_format: None,
                dimensions: None,
                user: None,
            };

            match self.client.embeddings().create(request).await {
                Ok(response) => {
                    let mut sorted: Vec<(usize, Vec<f32>)> = response
                        .data
                        .into_iter()
                        .map(|emb| (emb.index as usize, emb.embedding))
                        .collect();
                    sorted.sort_by_key(|(idx, _)| *idx);

                    if sorted.len() != texts.len() {
                        return Err(EmbeddingError::InferenceError(format!(
                            "Expected {} embeddings, got {}",
                            texts.len(),
                            sorted.len()
                        )));
                    }
                    for (_, embedding) in &sorted {
                        if embedding.len() != self.dimensions {
                            return Err(EmbeddingError::DimensionMismatch {
                                expected: self.dimensions,
                                actual: embedding.len(),
                            });
                        }
                    }

                    return Ok(sorted.into_iter().map(|(_, emb)| emb).collect());
                }
                Err(e) if attempt < self.retry_attempts => {
                    attempt += 1;
                    error!("Embedding request for {} texts failed: {e}", texts.len());

                    // 1s, 2s, 4s ... capped at 30s
                    let backoff = retry_backoff(attempt);
                    warn!(
                        "Retrying in {backoff:?} (attempt {attempt}/{})",
                        self.retry_attempts
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    return Err(EmbeddingError::InferenceError(format!(
                        "API request failed after {} attempts: {e}",
                        self.retry_attempts
                    )));
                }
            }
        }
    }
}

/// Exponential backoff before retry `attempt` (1-based), capped at 30s
fn retry_backoff(attempt: usize) -> Duration {
    let exponent = attempt.saturating_sub(1).min(5) as u32;
    Duration::from_secs(2u64.pow(exponent).min(30))
}

#[async_trait]
impl EmbeddingProvider for OpenAiApiProvider {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Option<Vec<f32>>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let total = texts.len();
        let batches: Vec<(usize, Vec<String>)> = texts
            .chunks(self.batch_size)
            .enumerate()
            .map(|(i, chunk)| (i * self.batch_size, chunk.to_vec()))
            .collect();

        debug!("Embedding {total} texts in {} batches", batches.len());

        let results = stream::iter(batches)
            .map(|(offset, batch)| async move {
                self.embed_batch(batch)
                    .await
                    .map(|embeddings| (offset, embeddings))
            })
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        let mut all_embeddings = vec![None; total];
        for result in results {
            let (offset, embeddings) = result?;
            for (i, embedding) in embeddings.into_iter().enumerate() {
                all_embeddings[offset + i] = Some(embedding);
            }
        }

        Ok(all_embeddings)
    }

    fn embedding_dimension(&self) -> usize {
        self.dimensions
    }
}

/// Create a new OpenAI-compatible API provider from configuration
pub fn create_api_provider(config: EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    let provider = OpenAiApiProvider::new(config)?;
    Ok(Box::new(provider))
}
