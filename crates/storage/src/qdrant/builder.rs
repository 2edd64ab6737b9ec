use crate::error::StorageError;
use crate::qdrant::client::QdrantContextStore;
use qdrant_client::qdrant::CollectionExistsRequest;
use qdrant_client::Qdrant;
use ragbench_core::{config::StorageConfig, Error};
use std::time::Duration;
use tracing::debug;

/// Builder for QdrantContextStore
pub(crate) struct QdrantContextStoreBuilder {
    config: StorageConfig,
}

impl QdrantContextStoreBuilder {
    /// Create a new builder with the given configuration
    pub fn from_config(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Build and connect to Qdrant
    pub async fn build(self) -> Result<QdrantContextStore, Error> {
        let url = self.config.qdrant_url();

        let mut client_config = qdrant_client::config::QdrantConfig::from_url(&url);
        client_config.timeout = Duration::from_millis(self.config.timeout_ms);

        // Add API key if provided (for Qdrant Cloud)
        if let Some(api_key) = &self.config.api_key {
            client_config.api_key = Some(api_key.clone());
        }

        let client = Qdrant::new(client_config)
            .map_err(|e| StorageError::ConnectionFailed(format!("{url}: {e}")))?;

        // Verify connection is alive
        client
            .health_check()
            .await
            .map_err(|e| StorageError::ConnectionFailed(format!("Health check failed: {e}")))?;

        let exists = client
            .collection_exists(CollectionExistsRequest {
                collection_name: self.config.collection_name.clone(),
            })
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        if !exists {
            return Err(StorageError::CollectionNotFound(self.config.collection_name).into());
        }

        debug!("Connected to Qdrant at {url}");

        Ok(QdrantContextStore::new(client, self.config))
    }
}
