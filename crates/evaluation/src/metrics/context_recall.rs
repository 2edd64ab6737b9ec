use super::{join_contexts, ratio, Metric, CONTEXT_RECALL};
use crate::error::Result;
use crate::json::{Judge, Verdict};
use crate::prompts::{format_prompt, CONTEXT_RECALL as CONTEXT_RECALL_PROMPT};
use async_trait::async_trait;
use ragbench_core::EvaluationSample;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Classification {
    attributed: Verdict,
}

#[derive(Debug, Deserialize)]
struct ClassificationsOutput {
    #[serde(default)]
    classifications: Vec<Classification>,
}

/// Share of reference sentences attributable to the retrieved contexts
pub struct ContextRecall {
    judge: Judge,
}

impl ContextRecall {
    pub fn new(judge: Judge) -> Self {
        Self { judge }
    }
}

#[async_trait]
impl Metric for ContextRecall {
    fn name(&self) -> &'static str {
        CONTEXT_RECALL
    }

    async fn score(&self, sample: &EvaluationSample) -> Result<Option<f64>> {
        let reference = sample.reference.trim();
        if reference.is_empty() {
            return Ok(None);
        }

        let context = join_contexts(&sample.retrieved_contexts);
        let prompt = format_prompt(
            CONTEXT_RECALL_PROMPT,
            &[
                ("question", sample.user_input.as_str()),
                ("context", context.as_str()),
                ("reference", reference),
            ],
        );
        let output: ClassificationsOutput = self.judge.ask(&prompt).await?;

        let attributed = output
            .classifications
            .iter()
            .filter(|c| c.attributed.0)
            .count();
        Ok(ratio(attributed, output.classifications.len()))
    }
}
