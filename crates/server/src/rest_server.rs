//! REST API server implementation using Axum
//!
//! Exposes the benchmark endpoint with OpenAPI documentation.

use crate::service::BenchmarkService;
use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use ragbench_core::config::ServerConfig;
use ragbench_core::{TestCase, TestResult};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared application state
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) service: Arc<BenchmarkService>,
}

/// Build the Axum router with all endpoints
pub fn build_router(service: Arc<BenchmarkService>, server_config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/benchmark/", post(benchmark_handler))
        .route("/benchmark", post(benchmark_handler))
        .route("/health", get(health_handler))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    router
        .layer(cors_layer(&server_config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        // CORS disabled
        return CorsLayer::new();
    }
    if allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    for origin in allowed_origins {
        match HeaderValue::from_str(origin) {
            Ok(header_value) => cors = cors.allow_origin(header_value),
            Err(_) => tracing::warn!("Ignoring invalid CORS origin '{origin}'"),
        }
    }
    cors
}

/// POST /benchmark/
#[utoipa::path(
    post,
    path = "/benchmark/",
    request_body = [TestCase],
    responses(
        (status = 200, description = "Scored answers, one per test case, in input order", body = [TestResult]),
        (status = 400, description = "Malformed request body"),
        (status = 422, description = "Request body does not match the test case schema"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Benchmark"
)]
async fn benchmark_handler(
    State(state): State<AppState>,
    Json(tests): Json<Vec<TestCase>>,
) -> Result<Json<Vec<TestResult>>, ApiError> {
    tracing::info!("Benchmark request: {} test cases", tests.len());

    let results = state.service.run_benchmark(&tests).await?;
    Ok(Json(results))
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy")
    ),
    tag = "health"
)]
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let health_status = serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "metrics": state.service.metric_names(),
    });

    (StatusCode::OK, Json(health_status))
}

/// Error handling for API endpoints
#[derive(Debug)]
pub enum ApiError {
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                tracing::error!("Internal server error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ragbench_core::Error> for ApiError {
    fn from(err: ragbench_core::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(title = "ragbench", description = "Benchmark a RAG service with LLM-judged metrics"),
    paths(benchmark_handler, health_handler),
    components(schemas(TestCase, TestResult)),
    tags(
        (name = "Benchmark", description = "Run test cases against the RAG service and score the answers"),
        (name = "health", description = "Health check endpoints")
    )
)]
struct ApiDoc;
