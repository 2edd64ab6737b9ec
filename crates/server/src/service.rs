//! Benchmark pipeline: ask the RAG service, resolve its sources, score the answers

use ragbench_core::{Config, EvaluationSample, Result, TestCase, TestResult};
use ragbench_evaluation::Evaluator;
use ragbench_rag_client::{HttpRagClient, RagServiceClient};
use ragbench_storage::{create_context_store, ContextStore};
use std::sync::Arc;
use tracing::info;

/// Runs test cases through the RAG service under test and scores the results
pub struct BenchmarkService {
    rag: Arc<dyn RagServiceClient>,
    contexts: Arc<dyn ContextStore>,
    evaluator: Arc<Evaluator>,
}

impl BenchmarkService {
    pub fn new(
        rag: Arc<dyn RagServiceClient>,
        contexts: Arc<dyn ContextStore>,
        evaluator: Arc<Evaluator>,
    ) -> Self {
        Self {
            rag,
            contexts,
            evaluator,
        }
    }

    /// Wire the RAG client, context store and evaluator from configuration.
    ///
    /// Connects to the vector store, so this fails when Qdrant is unreachable.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let rag = HttpRagClient::from_config(&config.rag_service)?;
        let contexts = create_context_store(&config.storage).await?;
        let evaluator = Evaluator::from_config(config)?;

        Ok(Self::new(Arc::new(rag), contexts, Arc::new(evaluator)))
    }

    /// Metrics reported for every test case
    pub fn metric_names(&self) -> Vec<&'static str> {
        self.evaluator.metric_names()
    }

    /// Ask the RAG service every question, in order, and attach the contexts it
    /// retrieved.
    pub async fn generate_dataset(&self, tests: &[TestCase]) -> Result<Vec<EvaluationSample>> {
        let mut samples = Vec::with_capacity(tests.len());
        for test in tests {
            let answer = self.rag.ask(&test.user_input).await;
            let retrieved_contexts = self.contexts.fetch_contexts(&answer.source_urls).await?;
            samples.push(EvaluationSample::from_test_case(
                test,
                answer.response,
                retrieved_contexts,
            ));
        }
        Ok(samples)
    }

    /// Run the whole benchmark for `tests`
    pub async fn run_benchmark(&self, tests: &[TestCase]) -> Result<Vec<TestResult>> {
        info!("Start benchmark ({} tests)", tests.len());
        let samples = self.generate_dataset(tests).await?;

        info!("Start evaluating");
        let scores = self.evaluator.evaluate(&samples).await;

        let results = samples
            .into_iter()
            .zip(scores)
            .map(|(sample, metrics)| sample.into_result(metrics))
            .collect();

        info!("Finish benchmark");
        Ok(results)
    }
}
