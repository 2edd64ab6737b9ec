//! Qdrant-backed context lookup

use crate::error::StorageError;
use crate::ContextStore;
use async_trait::async_trait;
use qdrant_client::qdrant::{
    value::Kind, Condition, Filter, ScrollPointsBuilder, Value as QdrantValue,
};
use qdrant_client::Qdrant;
use ragbench_core::{config::StorageConfig, Error};
use std::collections::HashMap;
use tracing::{debug, info};

/// Context store reading document payloads from a Qdrant collection
pub(crate) struct QdrantContextStore {
    client: Qdrant,
    config: StorageConfig,
}

impl QdrantContextStore {
    pub(crate) fn new(client: Qdrant, config: StorageConfig) -> Self {
        Self { client, config }
    }
}

/// Filter matching points whose `url_field` payload equals `source_url`
fn source_url_filter(url_field: &str, source_url: &str) -> Filter {
    Filter::must([Condition::matches(url_field, source_url.to_string())])
}

/// Read a string field from a Qdrant payload
fn payload_string(payload: &HashMap<String, QdrantValue>, key: &str) -> Option<String> {
    payload.get(key).and_then(|v| match v.kind.as_ref()? {
        Kind::StringValue(s) => Some(s.clone()),
        _ => None,
    })
}

#[async_trait]
impl ContextStore for QdrantContextStore {
    async fn fetch_context(&self, source_url: &str) -> Result<Option<String>, Error> {
        let scroll_result = self
            .client
            .scroll(
                ScrollPointsBuilder::new(self.config.collection_name.clone())
                    .filter(source_url_filter(&self.config.url_field, source_url))
                    .with_payload(true)
                    .limit(1),
            )
            .await
            .map_err(|e| {
                StorageError::BackendError(format!("Failed to scroll for {source_url}: {e}"))
            })?;

        let Some(point) = scroll_result.result.first() else {
            return Ok(None);
        };

        let content = payload_string(&point.payload, &self.config.content_field).unwrap_or_else(
            || {
                debug!(
                    "Point for {source_url} has no string field '{}'",
                    self.config.content_field
                );
                String::new()
            },
        );
        info!("Context fetched for {source_url} ({} chars)", content.len());

        Ok(Some(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::condition::ConditionOneOf;
    use qdrant_client::qdrant::r#match::MatchValue;

    fn string_value(s: &str) -> QdrantValue {
        QdrantValue {
            kind: Some(Kind::StringValue(s.to_string())),
        }
    }

    #[test]
    fn test_source_url_filter_is_keyword_match_on_url_field() {
        let filter = source_url_filter("metadata_url", "https://qdrant.tech/docs");

        assert_eq!(filter.must.len(), 1);
        assert!(filter.should.is_empty());
        assert!(filter.must_not.is_empty());

        let Some(ConditionOneOf::Field(field)) = &filter.must[0].condition_one_of else {
            panic!("expected a field condition, got {:?}", filter.must[0]);
        };
        assert_eq!(field.key, "metadata_url");
        assert_eq!(
            field.r#match.as_ref().and_then(|m| m.match_value.clone()),
            Some(MatchValue::Keyword("https://qdrant.tech/docs".to_string()))
        );
    }

    #[test]
    fn test_payload_string_reads_string_field() {
        let mut payload = HashMap::new();
        payload.insert("content".to_string(), string_value("Qdrant is a vector DB"));
        payload.insert("source_url".to_string(), string_value("https://qdrant.tech"));

        assert_eq!(
            payload_string(&payload, "content"),
            Some("Qdrant is a vector DB".to_string())
        );
    }

    #[test]
    fn test_payload_string_missing_field() {
        let payload = HashMap::new();
        assert_eq!(payload_string(&payload, "content"), None);
    }

    #[test]
    fn test_payload_string_ignores_non_string_values() {
        let mut payload = HashMap::new();
        payload.insert(
            "content".to_string(),
            QdrantValue {
                kind: Some(Kind::IntegerValue(42)),
            },
        );
        assert_eq!(payload_string(&payload, "content"), None);
    }
}
