use std::path::PathBuf;

use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
/// `BACKEND_URL` defaults to the local development backend; the API key is
/// required because the backend rejects unauthenticated calls.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub api_key: String,
    /// JWT bearer token for authenticated requests, when a session exists.
    pub bearer_token: Option<String>,
    /// Overrides the directory decode diagnostics are dumped into.
    pub debug_dump_dir: Option<PathBuf>,
    pub rust_log: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(ClientConfig {
            backend_url: std::env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            api_key: require_env("PORTFOLIOAI_API_KEY")?,
            bearer_token: std::env::var("PORTFOLIOAI_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            debug_dump_dir: std::env::var_os("DEBUG_DUMP_DIR").map(PathBuf::from),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Minimal config for library callers that manage their own settings.
    pub fn new(backend_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        ClientConfig {
            backend_url: backend_url.into(),
            api_key: api_key.into(),
            bearer_token: None,
            debug_dump_dir: None,
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
