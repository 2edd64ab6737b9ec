//! Retrieved-context lookup for benchmark samples
//!
//! The RAG service under test only reports the source URLs of the documents it
//! used. This crate resolves each URL back to the document text stored in the
//! vector database the RAG service reads from.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod error;
mod factory;
mod mock;

// Keep qdrant module private
mod qdrant;

// Export factory functions
pub use error::StorageError;
pub use factory::create_context_store;
pub use mock::MockContextStore;

use async_trait::async_trait;
use ragbench_core::Error;
use tracing::{debug, warn};

// ==== Traits ====

/// Lookup of document contents by source URL
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Fetch the content of the first document stored under `source_url`.
    ///
    /// Returns `Ok(None)` when no document matches.
    async fn fetch_context(&self, source_url: &str) -> Result<Option<String>, Error>;

    /// Fetch one context per source URL, in order.
    ///
    /// URLs without a matching document are skipped with a warning. Backend
    /// failures abort the whole lookup.
    async fn fetch_contexts(&self, source_urls: &[String]) -> Result<Vec<String>, Error> {
        let mut contexts = Vec::with_capacity(source_urls.len());
        for source_url in source_urls {
            debug!("Getting retrieved context for {source_url}");
            match self.fetch_context(source_url).await? {
                Some(content) => contexts.push(content),
                None => warn!("No document found for source url {source_url}, skipping"),
            }
        }
        Ok(contexts)
    }
}
