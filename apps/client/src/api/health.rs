use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::api::{ApiClient, DEFAULT_TIMEOUT};

/// Result of a backend reachability check. Never an error: an unreachable
/// backend is a state, not a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl ApiClient {
    /// GET /api/health
    pub async fn health_check(&self) -> HealthStatus {
        match self.get("/api/health", DEFAULT_TIMEOUT).await {
            Ok(raw) => HealthStatus {
                ok: raw.is_success(),
                data: serde_json::from_str(&raw.body_text).ok(),
                error: None,
            },
            Err(e) => {
                warn!("health check failed: {e}");
                HealthStatus {
                    ok: false,
                    data: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
