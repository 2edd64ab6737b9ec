//! Form-encoded HTTP client for the RAG service

use crate::{error::RagClientError, RagAnswer, RagServiceClient};
use async_trait::async_trait;
use ragbench_core::config::RagServiceConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

/// Body returned by the RAG service. Both fields are optional on the wire.
#[derive(Debug, Deserialize)]
struct RagServiceResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    source_urls: Option<Vec<String>>,
}

impl From<RagServiceResponse> for RagAnswer {
    fn from(body: RagServiceResponse) -> Self {
        Self {
            response: body.response.unwrap_or_default(),
            source_urls: body.source_urls.unwrap_or_default(),
        }
    }
}

/// RAG service client posting `{message_field}={query}` forms
pub struct HttpRagClient {
    client: Client,
    url: String,
    message_field: String,
}

impl HttpRagClient {
    /// Create a client for `url`
    ///
    /// # Arguments
    /// * `url` - Full endpoint URL, e.g. `http://localhost:8080/`
    /// * `message_field` - Form field carrying the question
    /// * `timeout_secs` - Per-request timeout
    pub fn new(
        url: impl Into<String>,
        message_field: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, RagClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RagClientError::ClientInit(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            message_field: message_field.into(),
        })
    }

    pub fn from_config(config: &RagServiceConfig) -> Result<Self, RagClientError> {
        let url = config.url();
        info!("RAG service endpoint: {url}");
        Self::new(url, config.message_field.clone(), config.timeout_secs)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn try_ask(&self, query: &str) -> Result<RagAnswer, RagClientError> {
        let response = self
            .client
            .post(&self.url)
            .form(&[(self.message_field.as_str(), query)])
            .send()
            .await
            .map_err(|e| RagClientError::Request(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RagClientError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body: RagServiceResponse = response
            .json()
            .await
            .map_err(|e| RagClientError::InvalidResponse(e.to_string()))?;

        Ok(body.into())
    }
}

#[async_trait]
impl RagServiceClient for HttpRagClient {
    async fn ask(&self, query: &str) -> RagAnswer {
        info!("Request to rag service: {query}");

        match self.try_ask(query).await {
            Ok(answer) => {
                info!(
                    "Response is gotten. Response: {} Sources: {:?}",
                    answer.response, answer.source_urls
                );
                answer
            }
            Err(e) => {
                error!("RAG service call failed: {e}");
                debug!("Recording empty answer for: {query}");
                RagAnswer::empty()
            }
        }
    }
}
