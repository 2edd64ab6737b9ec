//! Trait definition for embedding providers

use async_trait::async_trait;
use ragbench_core::Result;

/// Trait for embedding providers
///
/// Implemented by the remote OpenAI-compatible provider and by the
/// deterministic mock used in tests.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a list of texts
    ///
    /// # Returns
    /// One entry per input text, in input order. `None` marks a text the
    /// provider could not embed.
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Option<Vec<f32>>>>;

    /// Size of the vectors produced by this provider
    fn embedding_dimension(&self) -> usize;
}
