use crate::{error::StorageError, mock::MockContextStore, ContextStore};
use ragbench_core::{config::StorageConfig, Error};
use std::sync::Arc;
use tracing::info;

use crate::qdrant::QdrantContextStoreBuilder;

/// Creates a context store based on configuration.
///
/// Returns a trait object so the benchmark service can run against Qdrant or
/// an empty in-memory store interchangeably.
///
/// # Errors
/// Returns an error if the provider is unknown or Qdrant cannot be reached
///
/// # Example
/// ```ignore
/// let store = create_context_store(&config.storage).await?;
/// let contexts = store.fetch_contexts(&source_urls).await?;
/// ```
pub async fn create_context_store(
    config: &StorageConfig,
) -> Result<Arc<dyn ContextStore>, Error> {
    match config.provider.as_str() {
        "qdrant" => {
            info!(
                "Connecting to Qdrant at {} (collection: {})",
                config.qdrant_url(),
                config.collection_name
            );
            let store = QdrantContextStoreBuilder::from_config(config.clone())
                .build()
                .await?;
            Ok(Arc::new(store) as Arc<dyn ContextStore>)
        }
        "mock" => {
            info!("Using empty mock context store");
            Ok(Arc::new(MockContextStore::new()) as Arc<dyn ContextStore>)
        }
        other => {
            Err(StorageError::InvalidConfig(format!("Unknown storage provider: {other}")).into())
        }
    }
}
