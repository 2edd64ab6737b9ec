//! LLM-judged quality metrics for RAG answers
//!
//! Scores question/answer/context samples with the standard RAG assessment
//! metrics:
//!
//! - `faithfulness`: answer statements supported by the retrieved contexts
//! - `answer_relevancy`: similarity of questions reconstructed from the answer
//!   to the real question
//! - `context_recall`: reference sentences attributable to the contexts
//! - `context_precision`: ranking quality of useful contexts
//!
//! Judging is delegated to a chat model behind the [`ChatModel`] trait;
//! answer relevancy also needs an embedding model.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod error;
mod evaluator;
mod json;
mod llm;
pub mod metrics;
mod prompts;

pub use error::{EvaluationError, Result};
pub use evaluator::Evaluator;
pub use json::Judge;
pub use llm::{create_chat_model, ChatModel, MockChatModel, OpenAiChatModel};
pub use metrics::{create_metric, Metric};
