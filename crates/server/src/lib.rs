//! HTTP front end for RAG benchmarking
//!
//! This crate wires the RAG client, the vector store and the evaluator into a
//! [`BenchmarkService`] and serves it over a small REST API.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod rest_server;
mod service;

pub use rest_server::{build_router, ApiError};
pub use service::BenchmarkService;

// Re-export error types from core
pub use ragbench_core::error::{Error, Result};

use ragbench_core::config::Config;
use std::sync::Arc;
use tracing::{info, warn};

/// Run the REST server with the given configuration.
///
/// Builds the benchmark service (connecting to Qdrant), binds
/// `server.host:server.port` and serves until Ctrl+C.
pub async fn run_server(config: Config) -> Result<()> {
    let service = Arc::new(BenchmarkService::from_config(&config).await?);
    info!("Evaluating metrics: {:?}", service.metric_names());

    let app = build_router(service, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;

    info!("REST API listening on http://{addr}");
    info!("Swagger UI available at http://{addr}/docs");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await
        }
    }
}
