use super::{Metric, ANSWER_RELEVANCY};
use crate::error::{EvaluationError, Result};
use crate::json::{Judge, Verdict};
use crate::prompts::{format_prompt, ANSWER_RELEVANCY_QUESTION};
use async_trait::async_trait;
use futures::future::try_join_all;
use ragbench_core::EvaluationSample;
use ragbench_embeddings::{cosine_similarity, EmbeddingManager};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    #[serde(default)]
    question: String,
    #[serde(default = "committal")]
    noncommittal: Verdict,
}

fn committal() -> Verdict {
    Verdict(false)
}

/// How well the answer addresses the question.
///
/// The judge reconstructs `strictness` questions from the answer; the score is
/// the mean cosine similarity between the real question and the generated ones,
/// forced to 0 when any generation flags the answer as noncommittal.
pub struct AnswerRelevancy {
    judge: Judge,
    embeddings: Arc<EmbeddingManager>,
    strictness: usize,
}

impl AnswerRelevancy {
    pub fn new(judge: Judge, embeddings: Arc<EmbeddingManager>, strictness: usize) -> Self {
        Self {
            judge,
            embeddings,
            strictness: strictness.max(1),
        }
    }
}

#[async_trait]
impl Metric for AnswerRelevancy {
    fn name(&self) -> &'static str {
        ANSWER_RELEVANCY
    }

    async fn score(&self, sample: &EvaluationSample) -> Result<Option<f64>> {
        let prompt = format_prompt(
            ANSWER_RELEVANCY_QUESTION,
            &[("answer", sample.response.as_str())],
        );
        let generations: Vec<GeneratedQuestion> = try_join_all(
            (0..self.strictness).map(|_| self.judge.ask::<GeneratedQuestion>(&prompt)),
        )
        .await?;

        if generations.iter().all(|g| g.question.trim().is_empty()) {
            return Ok(None);
        }
        let noncommittal = generations.iter().any(|g| g.noncommittal.0);

        let mut texts = Vec::with_capacity(generations.len() + 1);
        texts.push(sample.user_input.clone());
        texts.extend(generations.iter().map(|g| g.question.clone()));

        let embeddings = self
            .embeddings
            .embed(texts)
            .await
            .map_err(|e| EvaluationError::Embedding(e.to_string()))?;
        let mut vectors = embeddings.into_iter().map(|e| {
            e.ok_or_else(|| EvaluationError::Embedding("Text could not be embedded".to_string()))
        });

        let question = vectors
            .next()
            .ok_or_else(|| EvaluationError::Embedding("Empty embedding response".to_string()))??;
        let similarities = vectors
            .map(|generated| generated.map(|g| cosine_similarity(&question, &g) as f64))
            .collect::<Result<Vec<f64>>>()?;

        let mean = similarities.iter().sum::<f64>() / similarities.len() as f64;
        debug!("answer relevancy similarities {similarities:?}, noncommittal={noncommittal}");

        if noncommittal {
            return Ok(Some(0.0));
        }
        Ok(mean.is_finite().then(|| mean.clamp(0.0, 1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockChatModel;
    use ragbench_embeddings::{EmbeddingManager, MockEmbeddingProvider};

    fn metric(
        response: &'static str,
        strictness: usize,
    ) -> (AnswerRelevancy, Arc<MockChatModel>) {
        let model = Arc::new(MockChatModel::fixed(response));
        let embeddings = Arc::new(EmbeddingManager::new(
            Arc::new(MockEmbeddingProvider::new(256)),
            "mock".to_string(),
        ));
        (
            AnswerRelevancy::new(Judge::new(model.clone(), 0), embeddings, strictness),
            model,
        )
    }

    fn sample() -> EvaluationSample {
        EvaluationSample {
            user_input: "What is Qdrant?".to_string(),
            response: "Qdrant is a vector database.".to_string(),
            retrieved_contexts: vec![],
            reference: String::new(),
        }
    }

    #[tokio::test]
    async fn test_identical_question_scores_one() {
        let (metric, model) = metric(r#"{"question": "What is Qdrant?", "noncommittal": 0}"#, 3);

        let score = metric.score(&sample()).await.unwrap().unwrap();
        assert!((score - 1.0).abs() < 1e-6, "score was {score}");
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test]
    async fn test_noncommittal_answer_scores_zero() {
        let (metric, _) = metric(r#"{"question": "What is Qdrant?", "noncommittal": 1}"#, 2);
        assert_eq!(metric.score(&sample()).await.unwrap(), Some(0.0));
    }

    #[tokio::test]
    async fn test_empty_generations_are_undefined() {
        let (metric, _) = metric(r#"{"question": "", "noncommittal": 0}"#, 3);
        assert_eq!(metric.score(&sample()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unrelated_question_scores_lower() {
        let (metric, _) = metric(
            r#"{"question": "Which river flows through Paris?", "noncommittal": 0}"#,
            1,
        );
        let score = metric.score(&sample()).await.unwrap().unwrap();
        assert!(score < 0.5, "score was {score}");
    }
}
