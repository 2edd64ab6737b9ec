use super::{join_contexts, ratio, Metric, FAITHFULNESS};
use crate::error::Result;
use crate::json::{Judge, Verdict};
use crate::prompts::{
    format_prompt, numbered_list, FAITHFULNESS_STATEMENTS, FAITHFULNESS_VERDICTS,
};
use async_trait::async_trait;
use ragbench_core::EvaluationSample;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct StatementsOutput {
    #[serde(default)]
    statements: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StatementVerdict {
    #[serde(default)]
    statement: String,
    verdict: Verdict,
}

#[derive(Debug, Deserialize)]
struct VerdictsOutput {
    #[serde(default)]
    verdicts: Vec<StatementVerdict>,
}

/// Share of the answer's statements that can be inferred from the retrieved
/// contexts
pub struct Faithfulness {
    judge: Judge,
}

impl Faithfulness {
    pub fn new(judge: Judge) -> Self {
        Self { judge }
    }

    async fn statements(&self, sample: &EvaluationSample) -> Result<Vec<String>> {
        let prompt = format_prompt(
            FAITHFULNESS_STATEMENTS,
            &[
                ("question", sample.user_input.as_str()),
                ("answer", sample.response.as_str()),
            ],
        );
        let output: StatementsOutput = self.judge.ask(&prompt).await?;
        Ok(output
            .statements
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

#[async_trait]
impl Metric for Faithfulness {
    fn name(&self) -> &'static str {
        FAITHFULNESS
    }

    async fn score(&self, sample: &EvaluationSample) -> Result<Option<f64>> {
        if sample.response.trim().is_empty() {
            return Ok(None);
        }

        let statements = self.statements(sample).await?;
        if statements.is_empty() {
            return Ok(None);
        }

        let context = join_contexts(&sample.retrieved_contexts);
        let statement_list = numbered_list(&statements);
        let prompt = format_prompt(
            FAITHFULNESS_VERDICTS,
            &[
                ("context", context.as_str()),
                ("statements", statement_list.as_str()),
            ],
        );
        let output: VerdictsOutput = self.judge.ask(&prompt).await?;

        // Statements the judge skipped count as unsupported
        let supported = output
            .verdicts
            .iter()
            .take(statements.len())
            .filter(|v| v.verdict.0)
            .count();
        for v in &output.verdicts {
            debug!("faithfulness verdict {} for: {}", v.verdict.as_f64(), v.statement);
        }

        Ok(ratio(supported, statements.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockChatModel;
    use std::sync::Arc;

    fn sample(response: &str) -> EvaluationSample {
        EvaluationSample {
            user_input: "What is Qdrant?".to_string(),
            response: response.to_string(),
            retrieved_contexts: vec!["Qdrant is a vector database written in Rust.".to_string()],
            reference: String::new(),
        }
    }

    fn judge(responder: impl Fn(&str) -> crate::Result<String> + Send + Sync + 'static) -> Judge {
        Judge::new(Arc::new(MockChatModel::new(responder)), 0)
    }

    #[tokio::test]
    async fn test_supported_share() {
        let metric = Faithfulness::new(judge(|prompt| {
            if prompt.contains("break the answer down") {
                Ok(r#"{"statements": ["Qdrant is a vector database.", "Qdrant is written in Go."]}"#
                    .to_string())
            } else {
                Ok(r#"{"verdicts": [
                    {"statement": "Qdrant is a vector database.", "reason": "stated", "verdict": 1},
                    {"statement": "Qdrant is written in Go.", "reason": "context says Rust", "verdict": 0}
                ]}"#
                .to_string())
            }
        }));

        let score = metric
            .score(&sample("Qdrant is a vector database written in Go."))
            .await
            .unwrap();
        assert_eq!(score, Some(0.5));
    }

    #[tokio::test]
    async fn test_no_statements_is_undefined() {
        let metric = Faithfulness::new(judge(|_| Ok(r#"{"statements": []}"#.to_string())));
        assert_eq!(metric.score(&sample("Hmm.")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_response_skips_judge() {
        let model = Arc::new(MockChatModel::fixed("{}"));
        let metric = Faithfulness::new(Judge::new(model.clone(), 0));

        assert_eq!(metric.score(&sample("  ")).await.unwrap(), None);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_verdicts_count_as_unsupported() {
        let metric = Faithfulness::new(judge(|prompt| {
            if prompt.contains("break the answer down") {
                Ok(r#"{"statements": ["a", "b", "c", "d"]}"#.to_string())
            } else {
                Ok(r#"{"verdicts": [{"statement": "a", "verdict": 1}]}"#.to_string())
            }
        }));
        assert_eq!(metric.score(&sample("a b c d")).await.unwrap(), Some(0.25));
    }
}
