//! Chat models used as metric judges

use crate::error::{EvaluationError, Result};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use ragbench_core::config::LlmConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// A model answering a single-turn prompt with text
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Chat model served by an OpenAI-compatible chat completions API
pub struct OpenAiChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    concurrency_limiter: Arc<Semaphore>,
    retry_attempts: usize,
}

impl OpenAiChatModel {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        info!("Initializing chat model {}", config.model);
        info!("  Base URL: {}", config.api_base_url);
        info!("  Max concurrent requests: {}", config.max_concurrent_requests);

        let mut openai_config = OpenAIConfig::new().with_api_base(&config.api_base_url);
        match config.resolve_api_key() {
            Some(api_key) => openai_config = openai_config.with_api_key(api_key),
            None => warn!("No API key configured for the LLM, sending unauthenticated requests"),
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EvaluationError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client: Client::with_config(openai_config).with_http_client(http_client),
            model: config.model.clone(),
            temperature: config.temperature,
            concurrency_limiter: Arc::new(Semaphore::new(config.max_concurrent_requests.max(1))),
            retry_attempts: config.retry_attempts,
        })
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let message: ChatCompletionRequestMessage =
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| EvaluationError::Llm(format!("Failed to build message: {e}")))?
                .into();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(vec![message])
            .build()
            .map_err(|e| EvaluationError::Llm(format!("Failed to build request: {e}")))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| EvaluationError::Llm(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EvaluationError::Llm("Completion has no content".to_string()))
    }
}

/// Exponential backoff before retry `attempt` (1-based), capped at 30s
fn retry_backoff(attempt: usize) -> Duration {
    let exponent = attempt.saturating_sub(1).min(5) as u32;
    Duration::from_secs(2u64.pow(exponent).min(30))
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let _permit = self.concurrency_limiter.acquire().await.map_err(|e| {
            EvaluationError::Llm(format!("Failed to acquire concurrency permit: {e}"))
        })?;

        let mut attempt = 0;
        loop {
            match self.request(prompt).await {
                Ok(content) => return Ok(content),
                Err(e) if attempt < self.retry_attempts => {
                    attempt += 1;
                    let backoff = retry_backoff(attempt);
                    warn!(
                        "Chat completion failed: {e}. Retrying in {backoff:?} (attempt {attempt}/{})",
                        self.retry_attempts
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    return Err(EvaluationError::Llm(format!(
                        "Chat completion failed after {} attempts: {e}",
                        self.retry_attempts
                    )))
                }
            }
        }
    }
}

type Responder = dyn Fn(&str) -> Result<String> + Send + Sync;

/// Chat model answering through a closure
pub struct MockChatModel {
    responder: Box<Responder>,
    calls: AtomicUsize,
}

impl MockChatModel {
    pub fn new(responder: impl Fn(&str) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer every prompt with the same text
    pub fn fixed(response: impl Into<String>) -> Self {
        let response = response.into();
        Self::new(move |_| Ok(response.clone()))
    }

    /// Number of prompts answered so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("Mock chat model prompted ({} chars)", prompt.len());
        (self.responder)(prompt)
    }
}

/// Create the judge model selected by `llm.provider`
///
/// The `mock` provider answers `{}` to everything, so judged metrics come out
/// as null. It exists for wiring checks without an LLM.
pub fn create_chat_model(config: &LlmConfig) -> Result<Arc<dyn ChatModel>> {
    match config.provider.to_lowercase().as_str() {
        "openai" => Ok(Arc::new(OpenAiChatModel::new(config)?)),
        "mock" => {
            info!("Using mock chat model");
            Ok(Arc::new(MockChatModel::fixed("{}")))
        }
        other => Err(EvaluationError::Config(format!("Unknown LLM provider: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_backoff_is_capped() {
        assert_eq!(retry_backoff(1), Duration::from_secs(1));
        assert_eq!(retry_backoff(3), Duration::from_secs(4));
        assert_eq!(retry_backoff(6), Duration::from_secs(30));
        assert_eq!(retry_backoff(100), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_mock_chat_model_counts_calls() {
        let model = MockChatModel::new(|prompt| Ok(prompt.to_uppercase()));
        assert_eq!(model.complete("abc").await.unwrap(), "ABC");
        assert_eq!(model.complete("d").await.unwrap(), "D");
        assert_eq!(model.calls(), 2);
    }

    #[test]
    fn test_create_chat_model_providers() {
        let openai = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..LlmConfig::default()
        };
        assert!(create_chat_model(&openai).is_ok());

        let mock = LlmConfig {
            provider: "mock".to_string(),
            ..LlmConfig::default()
        };
        assert!(create_chat_model(&mock).is_ok());

        let unknown = LlmConfig {
            provider: "anthropic".to_string(),
            ..LlmConfig::default()
        };
        let err = create_chat_model(&unknown).err().unwrap();
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown LLM provider: anthropic"
        );
    }
}
