use ragbench_core::config::StorageConfig;
use ragbench_storage::create_context_store;

#[tokio::test]
async fn test_mock_provider_creates_empty_store() {
    let config = StorageConfig {
        provider: "mock".to_string(),
        ..Default::default()
    };

    let store = create_context_store(&config)
        .await
        .expect("Failed to create mock store");

    let context = store.fetch_context("https://example.com").await.unwrap();
    assert!(context.is_none());
}

#[tokio::test]
async fn test_unknown_provider_is_rejected() {
    let config = StorageConfig {
        provider: "pinecone".to_string(),
        ..Default::default()
    };

    let result = create_context_store(&config).await;
    let err = result.err().expect("Unknown provider should fail");
    assert!(err.to_string().contains("Unknown storage provider: pinecone"));
}

#[tokio::test]
async fn test_unreachable_qdrant_fails_fast() {
    let config = StorageConfig {
        provider: "qdrant".to_string(),
        qdrant_host: "127.0.0.1".to_string(),
        qdrant_port: 1,
        timeout_ms: 500,
        ..Default::default()
    };

    assert!(create_context_store(&config).await.is_err());
}
