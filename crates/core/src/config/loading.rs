//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{builder::DefaultState, Config as ConfigLib, ConfigBuilder, Environment, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::Config;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "ragbench.toml";

/// Flat environment variables and the config keys they override
const LEGACY_STRING_VARS: &[(&str, &str)] = &[
    ("MODEL_NAME", "llm.model"),
    ("EMBEDDINGS_MODEL_NAME", "embeddings.model"),
    ("API_CLIENT_TOKEN", "llm.api_key"),
    ("QDRANT_ADDRESS", "storage.qdrant_host"),
    ("QDRANT_COLLECTION", "storage.collection_name"),
    ("RAG_SERVICE_ADDRESS", "rag_service.host"),
];

/// `QDRANT_PORT` used to point at the REST API (6333). The client here speaks
/// gRPC, which Qdrant serves on 6334 by default.
const LEGACY_PORT_VARS: &[(&str, &str)] = &[
    ("QDRANT_PORT", "storage.qdrant_port"),
    ("RAG_SERVICE_PORT", "rag_service.port"),
];

const QDRANT_REST_PORT: u16 = 6333;

/// Apply the legacy flat environment variables as overrides
fn apply_legacy_env(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>> {
    for (var, key) in LEGACY_STRING_VARS {
        if let Ok(value) = std::env::var(var) {
            builder = builder
                .set_override(*key, value)
                .map_err(|e| Error::config(format!("Failed to set {var}: {e}")))?;
        }
    }

    for (var, key) in LEGACY_PORT_VARS {
        if let Ok(port) = std::env::var(var) {
            let port_num = port
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::config(format!("Invalid {var}: {port}")))?;
            if *var == "QDRANT_PORT" && port_num == QDRANT_REST_PORT {
                warn!(
                    "QDRANT_PORT={port_num} is the Qdrant REST port; the gRPC client usually needs 6334"
                );
            }
            builder = builder
                .set_override(*key, port_num as i64)
                .map_err(|e| Error::config(format!("Failed to set {var}: {e}")))?;
        }
    }

    Ok(builder)
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `RAGBENCH_` and use double underscores
    /// for nested values. For example:
    /// - `RAGBENCH_LLM__MODEL=openai/gpt-4o`
    /// - `RAGBENCH_EVALUATION__METRICS=faithfulness,context_recall`
    ///
    /// The legacy flat variables (`MODEL_NAME`, `QDRANT_ADDRESS`,
    /// `RAG_SERVICE_PORT`, ...) take precedence over both.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigLib::builder();

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("RAGBENCH")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("evaluation.metrics")
                .with_list_parse_key("server.allowed_origins")
                .try_parsing(true),
        );

        builder = apply_legacy_env(builder)?;

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (`./ragbench.toml` or custom --config path)
    /// 3. `.env` file in the working directory (never overrides the process environment)
    /// 4. Environment variables (RAGBENCH_*)
    /// 5. Legacy flat environment variables
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::config(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                p.to_path_buf()
            }
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        match dotenvy::dotenv() {
            Ok(env_path) => debug!("Loaded environment from {}", env_path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::config(format!("Failed to load .env file: {e}"))),
        }

        Self::from_file(&path)
    }
}
