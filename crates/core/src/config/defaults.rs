//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub(crate) const DEFAULT_RAG_HOST: &str = "localhost";
pub(crate) const DEFAULT_RAG_PATH: &str = "/";
pub(crate) const DEFAULT_RAG_MESSAGE_FIELD: &str = "message";
pub(crate) const DEFAULT_STORAGE_PROVIDER: &str = "qdrant";
pub(crate) const DEFAULT_QDRANT_HOST: &str = "localhost";
pub(crate) const DEFAULT_COLLECTION_NAME: &str = "documents";
pub(crate) const DEFAULT_URL_FIELD: &str = "source_url";
pub(crate) const DEFAULT_CONTENT_FIELD: &str = "content";
pub(crate) const DEFAULT_LLM_PROVIDER: &str = "openai";
pub(crate) const DEFAULT_LLM_MODEL: &str = "openai/gpt-4o-mini";
pub(crate) const DEFAULT_LLM_API_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub(crate) const DEFAULT_EMBEDDINGS_PROVIDER: &str = "localapi";
pub(crate) const DEFAULT_EMBEDDINGS_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub(crate) const DEFAULT_EMBEDDINGS_API_BASE_URL: &str = "http://localhost:8000/v1";

/// Metrics the evaluator knows how to compute
pub const SUPPORTED_METRICS: &[&str] = &[
    "faithfulness",
    "answer_relevancy",
    "context_recall",
    "context_precision",
];

pub(crate) fn default_server_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}

pub(crate) fn default_server_port() -> u16 {
    8000
}

pub(crate) fn default_rag_host() -> String {
    DEFAULT_RAG_HOST.to_string()
}

pub(crate) fn default_rag_port() -> u16 {
    8080
}

pub(crate) fn default_rag_path() -> String {
    DEFAULT_RAG_PATH.to_string()
}

pub(crate) fn default_rag_message_field() -> String {
    DEFAULT_RAG_MESSAGE_FIELD.to_string()
}

pub(crate) fn default_rag_timeout_secs() -> u64 {
    1000 // generation on the RAG side can be very slow
}

pub(crate) fn default_storage_provider() -> String {
    DEFAULT_STORAGE_PROVIDER.to_string()
}

pub(crate) fn default_qdrant_host() -> String {
    DEFAULT_QDRANT_HOST.to_string()
}

pub(crate) fn default_qdrant_port() -> u16 {
    6334
}

pub(crate) fn default_collection_name() -> String {
    DEFAULT_COLLECTION_NAME.to_string()
}

pub(crate) fn default_url_field() -> String {
    DEFAULT_URL_FIELD.to_string()
}

pub(crate) fn default_content_field() -> String {
    DEFAULT_CONTENT_FIELD.to_string()
}

pub(crate) fn default_storage_timeout_ms() -> u64 {
    30_000
}

pub(crate) fn default_llm_provider() -> String {
    DEFAULT_LLM_PROVIDER.to_string()
}

pub(crate) fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

pub(crate) fn default_llm_api_base_url() -> String {
    DEFAULT_LLM_API_BASE_URL.to_string()
}

pub(crate) fn default_llm_timeout_secs() -> u64 {
    180
}

pub(crate) fn default_llm_retry_attempts() -> usize {
    3
}

pub(crate) fn default_llm_max_concurrent_requests() -> usize {
    8
}

pub(crate) fn default_embeddings_provider() -> String {
    DEFAULT_EMBEDDINGS_PROVIDER.to_string()
}

pub(crate) fn default_embeddings_model() -> String {
    DEFAULT_EMBEDDINGS_MODEL.to_string()
}

pub(crate) fn default_embeddings_api_base_url() -> Option<String> {
    Some(DEFAULT_EMBEDDINGS_API_BASE_URL.to_string())
}

pub(crate) fn default_texts_per_api_request() -> usize {
    32
}

pub(crate) fn default_embedding_dimension() -> usize {
    384
}

pub(crate) fn default_embedding_retry_attempts() -> usize {
    3
}

pub(crate) fn default_metrics() -> Vec<String> {
    vec![
        "faithfulness".to_string(),
        "answer_relevancy".to_string(),
        "context_recall".to_string(),
        // "context_precision".to_string(),
    ]
}

pub(crate) fn default_answer_relevancy_strictness() -> usize {
    3
}

pub(crate) fn default_max_concurrent_samples() -> usize {
    4
}
