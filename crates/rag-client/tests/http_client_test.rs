//! HttpRagClient against a local stand-in RAG service

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Form, Json, Router,
};
use pretty_assertions::assert_eq;
use ragbench_rag_client::{HttpRagClient, RagAnswer, RagServiceClient};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

/// Serve `router` on an ephemeral port and return its base URL
async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn echo(Form(form): Form<HashMap<String, String>>) -> impl IntoResponse {
    let message = form.get("message").cloned().unwrap_or_default();
    Json(json!({
        "response": format!("echo: {message}"),
        "source_urls": ["https://docs/a", "https://docs/b"],
    }))
}

#[tokio::test]
async fn test_posts_form_and_parses_answer() {
    let base = spawn_service(Router::new().route("/", post(echo))).await;
    let client = HttpRagClient::new(format!("{base}/"), "message", 5).unwrap();

    let answer = client.ask("What is Qdrant?").await;

    assert_eq!(
        answer,
        RagAnswer::new(
            "echo: What is Qdrant?",
            vec!["https://docs/a".to_string(), "https://docs/b".to_string()]
        )
    );
}

#[tokio::test]
async fn test_custom_message_field() {
    let router = Router::new().route(
        "/ask",
        post(|Form(form): Form<HashMap<String, String>>| async move {
            Json(json!({ "response": form.get("question").cloned().unwrap_or_default() }))
        }),
    );
    let base = spawn_service(router).await;
    let client = HttpRagClient::new(format!("{base}/ask"), "question", 5).unwrap();

    let answer = client.ask("hello").await;
    assert_eq!(answer.response, "hello");
    assert!(answer.source_urls.is_empty());
}

#[tokio::test]
async fn test_non_200_yields_empty_answer() {
    let router = Router::new().route(
        "/",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_service(router).await;
    let client = HttpRagClient::new(format!("{base}/"), "message", 5).unwrap();

    assert_eq!(client.ask("q").await, RagAnswer::empty());
}

#[tokio::test]
async fn test_non_json_body_yields_empty_answer() {
    let router = Router::new().route("/", post(|| async { "not json" }));
    let base = spawn_service(router).await;
    let client = HttpRagClient::new(format!("{base}/"), "message", 5).unwrap();

    assert_eq!(client.ask("q").await, RagAnswer::empty());
}

#[tokio::test]
async fn test_unreachable_service_yields_empty_answer() {
    let client = HttpRagClient::new("http://127.0.0.1:1/", "message", 2).unwrap();
    assert_eq!(client.ask("q").await, RagAnswer::empty());
}

#[tokio::test]
async fn test_timeout_yields_empty_answer() {
    let router = Router::new().route(
        "/",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "response": "late" }))
        }),
    );
    let base = spawn_service(router).await;
    let client = HttpRagClient::new(format!("{base}/"), "message", 1).unwrap();

    assert_eq!(client.ask("q").await, RagAnswer::empty());
}
