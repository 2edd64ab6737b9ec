// Scripted RAG service for tests and offline runs
use crate::{RagAnswer, RagServiceClient};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// RAG client answering from a question → answer table
///
/// Unknown questions get the fallback answer, which is empty unless set.
#[derive(Debug, Default)]
pub struct MockRagClient {
    answers: HashMap<String, RagAnswer>,
    fallback: RagAnswer,
    asked: Mutex<Vec<String>>,
}

impl MockRagClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(
        mut self,
        query: impl Into<String>,
        response: impl Into<String>,
        source_urls: &[&str],
    ) -> Self {
        self.answers.insert(
            query.into(),
            RagAnswer::new(
                response,
                source_urls.iter().map(|u| u.to_string()).collect(),
            ),
        );
        self
    }

    pub fn with_fallback(mut self, answer: RagAnswer) -> Self {
        self.fallback = answer;
        self
    }

    /// Questions received so far, in call order
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RagServiceClient for MockRagClient {
    async fn ask(&self, query: &str) -> RagAnswer {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(query.to_string());
        }
        self.answers
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_and_fallback_answers() {
        let client = MockRagClient::new().with_answer("q1", "a1", &["u1", "u2"]);

        let answer = client.ask("q1").await;
        assert_eq!(answer.response, "a1");
        assert_eq!(answer.source_urls, vec!["u1", "u2"]);

        assert_eq!(client.ask("q2").await, RagAnswer::empty());
        assert_eq!(client.asked(), vec!["q1", "q2"]);
    }
}
