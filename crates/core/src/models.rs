//! Request and response models for benchmark operations
//!
//! These types form the wire contract of the benchmark endpoint and are shared
//! between the service layer, the evaluator and the CLI.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Name of an evaluation metric, e.g. `faithfulness`
pub type MetricName = String;

/// Scores keyed by metric name.
///
/// `None` is serialized as `null` and marks a metric that could not be
/// computed for the sample.
pub type MetricScores = BTreeMap<MetricName, Option<f64>>;

/// A single benchmark test case: a query and the expected answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TestCase {
    pub user_input: String,
    pub reference: String,
}

/// Result of running one test case through the RAG service and the evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TestResult {
    pub user_input: String,
    pub reference: String,
    pub response: String,
    pub retrieved_contexts: Vec<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub metrics: MetricScores,
}

/// A fully populated sample ready for scoring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSample {
    pub user_input: String,
    pub response: String,
    pub retrieved_contexts: Vec<String>,
    pub reference: String,
}

impl EvaluationSample {
    /// Build a sample from a test case and the RAG service output
    pub fn from_test_case(
        test: &TestCase,
        response: String,
        retrieved_contexts: Vec<String>,
    ) -> Self {
        Self {
            user_input: test.user_input.clone(),
            response,
            retrieved_contexts,
            reference: test.reference.clone(),
        }
    }

    /// Attach scores and turn the sample into a wire result
    pub fn into_result(self, metrics: MetricScores) -> TestResult {
        TestResult {
            user_input: self.user_input,
            reference: self.reference,
            response: self.response,
            retrieved_contexts: self.retrieved_contexts,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_case_deserializes_from_request_body() {
        let body = r#"[{"user_input": "What is Qdrant?", "reference": "A vector database."}]"#;
        let tests: Vec<TestCase> = serde_json::from_str(body).unwrap();
        assert_eq!(
            tests,
            vec![TestCase {
                user_input: "What is Qdrant?".to_string(),
                reference: "A vector database.".to_string(),
            }]
        );
    }

    #[test]
    fn test_case_requires_reference() {
        let body = r#"{"user_input": "What is Qdrant?"}"#;
        assert!(serde_json::from_str::<TestCase>(body).is_err());
    }

    #[test]
    fn test_result_serializes_missing_scores_as_null() {
        let sample = EvaluationSample {
            user_input: "q".to_string(),
            response: "a".to_string(),
            retrieved_contexts: vec!["ctx".to_string()],
            reference: "r".to_string(),
        };
        let mut metrics = MetricScores::new();
        metrics.insert("faithfulness".to_string(), Some(0.5));
        metrics.insert("context_recall".to_string(), None);

        let value = serde_json::to_value(sample.into_result(metrics)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "user_input": "q",
                "reference": "r",
                "response": "a",
                "retrieved_contexts": ["ctx"],
                "metrics": {"context_recall": null, "faithfulness": 0.5}
            })
        );
    }
}
