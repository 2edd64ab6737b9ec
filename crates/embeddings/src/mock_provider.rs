//! Mock embedding provider for testing

use crate::provider::EmbeddingProvider;
use async_trait::async_trait;
use ragbench_core::Result;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Mock embedding provider producing hashed bag-of-words vectors.
///
/// Identical texts map to identical vectors and texts sharing words have a
/// positive cosine similarity, which is enough to exercise similarity-based
/// scoring without a model server.
pub struct MockEmbeddingProvider {
    embedding_dim: usize,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with specified embedding dimension
    pub fn new(embedding_dim: usize) -> Self {
        Self {
            embedding_dim: embedding_dim.max(1),
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.embedding_dim];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() % self.embedding_dim as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Option<Vec<f32>>>> {
        Ok(texts
            .iter()
            .map(|text| Some(self.embed_text(text)))
            .collect())
    }

    fn embedding_dimension(&self) -> usize {
        self.embedding_dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosine_similarity;

    #[tokio::test]
    async fn test_identical_texts_have_identical_vectors() {
        let provider = MockEmbeddingProvider::new(64);
        let embeddings = provider
            .embed(vec![
                "What is Qdrant?".to_string(),
                "what is qdrant".to_string(),
            ])
            .await
            .unwrap();

        let a = embeddings[0].as_ref().unwrap();
        let b = embeddings[1].as_ref().unwrap();
        assert_eq!(a.len(), 64);
        assert!((cosine_similarity(a, b) - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let provider = MockEmbeddingProvider::new(8);
        let embeddings = provider.embed(vec![String::new()]).await.unwrap();
        assert!(embeddings[0].as_ref().unwrap().iter().all(|v| *v == 0.0));
    }
}
