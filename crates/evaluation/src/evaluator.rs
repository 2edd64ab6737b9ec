//! Scores benchmark samples with the configured metrics

use crate::error::Result;
use crate::json::Judge;
use crate::llm::{create_chat_model, ChatModel};
use crate::metrics::{create_metric, Metric, ANSWER_RELEVANCY};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use ragbench_core::config::{Config, EvaluationConfig};
use ragbench_core::{EvaluationSample, MetricScores};
use ragbench_embeddings::{create_embedding_manager_from_app_config, EmbeddingManager};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Evaluator {
    metrics: Vec<Arc<dyn Metric>>,
    max_concurrent_samples: usize,
}

impl Evaluator {
    pub fn new(metrics: Vec<Arc<dyn Metric>>, max_concurrent_samples: usize) -> Self {
        Self {
            metrics,
            max_concurrent_samples: max_concurrent_samples.max(1),
        }
    }

    /// Build the metrics named in `config.evaluation` on top of the given models
    pub fn from_parts(
        config: &EvaluationConfig,
        chat: Arc<dyn ChatModel>,
        embeddings: Option<Arc<EmbeddingManager>>,
        judge_retry_attempts: usize,
    ) -> Result<Self> {
        let judge = Judge::new(chat, judge_retry_attempts);
        let metrics = config
            .metrics
            .iter()
            .map(|name| {
                create_metric(
                    name,
                    &judge,
                    embeddings.as_ref(),
                    config.answer_relevancy_strictness,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(metrics, config.max_concurrent_samples))
    }

    /// Wire the judge and embedding models from configuration
    pub fn from_config(config: &Config) -> ragbench_core::Result<Self> {
        let chat = create_chat_model(&config.llm)?;

        let needs_embeddings = config
            .evaluation
            .metrics
            .iter()
            .any(|m| m == ANSWER_RELEVANCY);
        let embeddings = if needs_embeddings {
            Some(create_embedding_manager_from_app_config(&config.embeddings)?)
        } else {
            None
        };

        Ok(Self::from_parts(
            &config.evaluation,
            chat,
            embeddings,
            config.llm.retry_attempts,
        )?)
    }

    /// Names of the metrics computed for every sample
    pub fn metric_names(&self) -> Vec<&'static str> {
        self.metrics.iter().map(|m| m.name()).collect()
    }

    /// Score every sample. Results are in input order.
    ///
    /// A metric that fails is logged and recorded as `None`; it never fails
    /// the run.
    pub async fn evaluate(&self, samples: &[EvaluationSample]) -> Vec<MetricScores> {
        info!(
            "Evaluating {} samples with metrics {:?}",
            samples.len(),
            self.metric_names()
        );

        let scores: Vec<MetricScores> = stream::iter(0..samples.len())
            .map(|index| self.score_sample(index, &samples[index]))
            .buffered(self.max_concurrent_samples)
            .collect()
            .await;

        for name in self.metric_names() {
            match mean_score(&scores, name) {
                Some(mean) => info!("{name}: mean {mean:.4}"),
                None => info!("{name}: no computable scores"),
            }
        }
        info!("Evaluation finished");

        scores
    }

    async fn score_sample(&self, index: usize, sample: &EvaluationSample) -> MetricScores {
        let results = join_all(self.metrics.iter().map(|metric| async move {
            let score = match metric.score(sample).await {
                Ok(score) => score,
                Err(e) => {
                    warn!("Metric {} failed for sample {index}: {e}", metric.name());
                    None
                }
            };
            (metric.name().to_string(), score)
        }))
        .await;

        let scores: MetricScores = results.into_iter().collect::<BTreeMap<_, _>>();
        debug!("Sample {index} scores: {scores:?}");
        scores
    }
}

/// Mean of the computed scores of one metric
fn mean_score(scores: &[MetricScores], metric: &str) -> Option<f64> {
    let values: Vec<f64> = scores
        .iter()
        .filter_map(|s| s.get(metric).copied().flatten())
        .collect();
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}
