//! Judged RAG metrics
//!
//! Every metric scores one [`EvaluationSample`] in `[0, 1]`. `Ok(None)` means
//! the score is undefined for the sample, e.g. an answer without statements.

mod answer_relevancy;
mod context_precision;
mod context_recall;
mod faithfulness;

pub use answer_relevancy::AnswerRelevancy;
pub use context_precision::ContextPrecision;
pub use context_recall::ContextRecall;
pub use faithfulness::Faithfulness;

use crate::error::{EvaluationError, Result};
use crate::json::Judge;
use async_trait::async_trait;
use ragbench_core::EvaluationSample;
use ragbench_embeddings::EmbeddingManager;
use std::sync::Arc;

pub const FAITHFULNESS: &str = "faithfulness";
pub const ANSWER_RELEVANCY: &str = "answer_relevancy";
pub const CONTEXT_RECALL: &str = "context_recall";
pub const CONTEXT_PRECISION: &str = "context_precision";

#[async_trait]
pub trait Metric: Send + Sync {
    /// Key of this metric in the result's score map
    fn name(&self) -> &'static str;

    async fn score(&self, sample: &EvaluationSample) -> Result<Option<f64>>;
}

/// Build a metric by name
///
/// `embeddings` is only needed by `answer_relevancy`.
pub fn create_metric(
    name: &str,
    judge: &Judge,
    embeddings: Option<&Arc<EmbeddingManager>>,
    answer_relevancy_strictness: usize,
) -> Result<Arc<dyn Metric>> {
    match name {
        FAITHFULNESS => Ok(Arc::new(Faithfulness::new(judge.clone()))),
        ANSWER_RELEVANCY => {
            let embeddings = embeddings.ok_or_else(|| {
                EvaluationError::Config("answer_relevancy requires an embedding model".to_string())
            })?;
            Ok(Arc::new(AnswerRelevancy::new(
                judge.clone(),
                Arc::clone(embeddings),
                answer_relevancy_strictness,
            )))
        }
        CONTEXT_RECALL => Ok(Arc::new(ContextRecall::new(judge.clone()))),
        CONTEXT_PRECISION => Ok(Arc::new(ContextPrecision::new(judge.clone()))),
        other => Err(EvaluationError::UnknownMetric(other.to_string())),
    }
}

/// Retrieved contexts as one block of text for a judge prompt
pub(crate) fn join_contexts(contexts: &[String]) -> String {
    contexts.join("\n")
}

/// Fraction of positive verdicts, `None` for an empty list
pub(crate) fn ratio(positive: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| positive as f64 / total as f64)
}
