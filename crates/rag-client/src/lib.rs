//! Client for the RAG service under test
//!
//! The benchmark sends each test question to the RAG service and records the
//! generated answer together with the source URLs of the documents the
//! service used. A failing call never aborts a benchmark: it is logged and
//! yields an empty answer.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod error;
mod http;
mod mock;

pub use error::RagClientError;
pub use http::HttpRagClient;
pub use mock::MockRagClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Answer produced by the RAG service for one question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagAnswer {
    pub response: String,
    pub source_urls: Vec<String>,
}

impl RagAnswer {
    pub fn new(response: impl Into<String>, source_urls: Vec<String>) -> Self {
        Self {
            response: response.into(),
            source_urls,
        }
    }

    /// Answer recorded when the service could not be reached
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Question answering endpoint of a RAG service
#[async_trait]
pub trait RagServiceClient: Send + Sync {
    /// Ask one question. Infallible: failures produce [`RagAnswer::empty`].
    async fn ask(&self, query: &str) -> RagAnswer;
}
