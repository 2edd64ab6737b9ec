// In-memory context store for tests and offline runs
use crate::ContextStore;
use async_trait::async_trait;
use ragbench_core::Error;
use std::collections::HashMap;

/// Context store backed by a URL → content map
#[derive(Debug, Default, Clone)]
pub struct MockContextStore {
    documents: HashMap<String, String>,
}

impl MockContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under `source_url`
    pub fn with_document(
        mut self,
        source_url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.documents.insert(source_url.into(), content.into());
        self
    }
}

#[async_trait]
impl ContextStore for MockContextStore {
    async fn fetch_context(&self, source_url: &str) -> Result<Option<String>, Error> {
        Ok(self.documents.get(source_url).cloned())
    }
}
