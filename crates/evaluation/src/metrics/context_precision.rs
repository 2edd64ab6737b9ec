use super::{Metric, CONTEXT_PRECISION};
use crate::error::Result;
use crate::json::{Judge, Verdict};
use crate::prompts::{format_prompt, CONTEXT_PRECISION as CONTEXT_PRECISION_PROMPT};
use async_trait::async_trait;
use futures::future::try_join_all;
use ragbench_core::EvaluationSample;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct UsefulnessVerdict {
    verdict: Verdict,
}

/// Added to the denominator so a sample without useful contexts scores 0
const EPSILON: f64 = 1e-10;

/// Whether useful contexts are ranked above useless ones
pub struct ContextPrecision {
    judge: Judge,
}

impl ContextPrecision {
    pub fn new(judge: Judge) -> Self {
        Self { judge }
    }
}

/// Average precision over the ranked verdicts
pub(crate) fn average_precision(verdicts: &[bool]) -> f64 {
    let mut useful_so_far = 0usize;
    let mut numerator = 0.0;

    for (k, useful) in verdicts.iter().enumerate() {
        if *useful {
            useful_so_far += 1;
            numerator += useful_so_far as f64 / (k + 1) as f64;
        }
    }

    numerator / (useful_so_far as f64 + EPSILON)
}

#[async_trait]
impl Metric for ContextPrecision {
    fn name(&self) -> &'static str {
        CONTEXT_PRECISION
    }

    async fn score(&self, sample: &EvaluationSample) -> Result<Option<f64>> {
        let reference = sample.reference.trim();
        if reference.is_empty() {
            return Ok(None);
        }

        let prompts: Vec<String> = sample
            .retrieved_contexts
            .iter()
            .map(|context| {
                format_prompt(
                    CONTEXT_PRECISION_PROMPT,
                    &[
                        ("question", sample.user_input.as_str()),
                        ("context", context.as_str()),
                        ("reference", reference),
                    ],
                )
            })
            .collect();

        let verdicts: Vec<UsefulnessVerdict> =
            try_join_all(prompts.iter().map(|p| self.judge.ask::<UsefulnessVerdict>(p))).await?;
        let useful: Vec<bool> = verdicts.iter().map(|v| v.verdict.0).collect();

        Ok(Some(average_precision(&useful).clamp(0.0, 1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockChatModel;
    use std::sync::Arc;

    #[test]
    fn test_average_precision() {
        assert!((average_precision(&[true, true]) - 1.0).abs() < 1e-6);
        assert_eq!(average_precision(&[false, false]), 0.0);
        assert_eq!(average_precision(&[]), 0.0);
        // (1/2) / 1
        assert!((average_precision(&[false, true]) - 0.5).abs() < 1e-6);
        // (1/1 + 2/3) / 2
        assert!((average_precision(&[true, false, true]) - 5.0 / 6.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_one_verdict_per_context() {
        let model = Arc::new(MockChatModel::new(|prompt| {
            if prompt.contains("useful doc") {
                Ok(r#"{"reason": "mentions Paris", "verdict": 1}"#.to_string())
            } else {
                Ok(r#"{"reason": "unrelated", "verdict": 0}"#.to_string())
            }
        }));
        let metric = ContextPrecision::new(Judge::new(model.clone(), 0));
        let sample = EvaluationSample {
            user_input: "Where is the Eiffel Tower?".to_string(),
            response: "Paris".to_string(),
            retrieved_contexts: vec!["noise".to_string(), "useful doc".to_string()],
            reference: "The Eiffel Tower is in Paris.".to_string(),
        };

        let score = metric.score(&sample).await.unwrap().unwrap();
        assert!((score - 0.5).abs() < 1e-6);
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_no_contexts_scores_zero() {
        let model = Arc::new(MockChatModel::fixed("{}"));
        let metric = ContextPrecision::new(Judge::new(model, 0));
        let sample = EvaluationSample {
            user_input: "q".to_string(),
            response: "a".to_string(),
            retrieved_contexts: vec![],
            reference: "r".to_string(),
        };
        assert_eq!(metric.score(&sample).await.unwrap(), Some(0.0));
    }
}
