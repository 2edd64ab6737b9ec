//! Integration tests for the Qdrant context store
//!
//! These tests require a running Qdrant instance with a `ragbench_test`
//! collection whose points carry `source_url` and `content` payload fields.
//! The lookup test seeds and drops its own collection.
//! Run with: cargo test --package ragbench-storage -- --ignored

use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use ragbench_core::config::StorageConfig;
use ragbench_storage::create_context_store;

fn test_config() -> StorageConfig {
    StorageConfig {
        provider: "qdrant".to_string(),
        qdrant_host: "localhost".to_string(),
        qdrant_port: 6334,
        collection_name: "ragbench_test".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore] // Run with --ignored when Qdrant is available
async fn test_fetch_unknown_url_returns_none() {
    let store = create_context_store(&test_config())
        .await
        .expect("Qdrant not available");

    let context = store
        .fetch_context("https://example.invalid/never-indexed")
        .await
        .unwrap();
    assert!(context.is_none());
}

#[tokio::test]
#[ignore] // Run with --ignored when Qdrant is available
async fn test_missing_collection_is_reported() {
    let config = StorageConfig {
        collection_name: "ragbench_missing_collection".to_string(),
        ..test_config()
    };

    let result = create_context_store(&config).await;
    let err = result.err().expect("Missing collection should fail");
    assert!(err.to_string().contains("Collection not found"));
}

const LOOKUP_COLLECTION: &str = "ragbench_lookup_test";

/// Recreate `LOOKUP_COLLECTION` with one point that has content and one that
/// only carries its url
async fn seed_lookup_collection() -> Qdrant {
    let client = Qdrant::from_url("http://localhost:6334")
        .build()
        .expect("Failed to build Qdrant client");

    if client.collection_exists(LOOKUP_COLLECTION).await.unwrap() {
        client.delete_collection(LOOKUP_COLLECTION).await.unwrap();
    }
    client
        .create_collection(
            CreateCollectionBuilder::new(LOOKUP_COLLECTION)
                .vectors_config(VectorParamsBuilder::new(4, Distance::Cosine)),
        )
        .await
        .unwrap();

    let mut with_content = Payload::new();
    with_content.insert("source_url", "https://docs.example/with-content");
    with_content.insert("content", "Qdrant stores vectors with payloads.");

    let mut without_content = Payload::new();
    without_content.insert("source_url", "https://docs.example/no-content");

    let points = vec![
        PointStruct::new(1, vec![0.1, 0.2, 0.3, 0.4], with_content),
        PointStruct::new(2, vec![0.4, 0.3, 0.2, 0.1], without_content),
    ];
    client
        .upsert_points(UpsertPointsBuilder::new(LOOKUP_COLLECTION, points).wait(true))
        .await
        .unwrap();

    client
}

#[tokio::test]
#[ignore] // Run with --ignored when Qdrant is available
async fn test_fetch_context_for_seeded_points() {
    let client = seed_lookup_collection().await;
    let config = StorageConfig {
        collection_name: LOOKUP_COLLECTION.to_string(),
        ..test_config()
    };
    let store = create_context_store(&config).await.unwrap();

    let found = store
        .fetch_context("https://docs.example/with-content")
        .await
        .unwrap();
    assert_eq!(
        found,
        Some("Qdrant stores vectors with payloads.".to_string())
    );

    // A matching point without a content field yields an empty context
    let empty = store
        .fetch_context("https://docs.example/no-content")
        .await
        .unwrap();
    assert_eq!(empty, Some(String::new()));

    let contexts = store
        .fetch_contexts(&[
            "https://docs.example/no-content".to_string(),
            "https://docs.example/missing".to_string(),
            "https://docs.example/with-content".to_string(),
        ])
        .await
        .unwrap();
    assert_eq!(
        contexts,
        vec![
            String::new(),
            "Qdrant stores vectors with payloads.".to_string()
        ]
    );

    client.delete_collection(LOOKUP_COLLECTION).await.unwrap();
}
