//! API surface: one module per backend endpoint group, all sharing the
//! `ApiClient` transport plumbing defined here.

pub mod cover_letter;
pub mod cv;
pub mod health;
pub mod optimize;
pub mod portfolio;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::recovery::diagnostics::{DiagnosticSink, FileSink};
use crate::transport::RawResponse;

/// Plain CRUD-ish calls.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Cover letter generation is one LLM round trip.
pub(crate) const COVER_LETTER_TIMEOUT: Duration = Duration::from_secs(60);
/// Resume optimization is the slowest LLM call on the happy path.
pub(crate) const OPTIMIZE_TIMEOUT: Duration = Duration::from_secs(120);
/// CV generation renders a document after the LLM call; the backend's own
/// limit is 180s, so the client waits slightly longer.
pub(crate) const CV_GENERATE_TIMEOUT: Duration = Duration::from_secs(190);

const API_KEY_HEADER: &str = "X-API-Key";

/// The single owner of the HTTP connection pool and credentials. All
/// backend calls go through this client; per-operation timeouts are set on
/// each request rather than on the pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    bearer_token: Option<String>,
    pub(crate) sink: Arc<dyn DiagnosticSink>,
}

impl ApiClient {
    /// Client with the default file-based diagnostic sink.
    pub fn new(config: &ClientConfig) -> Self {
        let dir = config
            .debug_dump_dir
            .clone()
            .unwrap_or_else(FileSink::default_dir);
        Self::with_sink(config, Arc::new(FileSink::new(dir)))
    }

    /// Client with an injected diagnostic sink. Use `NullSink` to disable
    /// failure dumps entirely.
    pub fn with_sink(config: &ClientConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        ApiClient {
            http: reqwest::Client::builder()
                .build()
                .expect("Failed to build HTTP client"),
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            bearer_token: config.bearer_token.clone(),
            sink,
        }
    }

    /// Replaces the bearer token used for authenticated calls.
    pub fn set_bearer_token(&mut self, token: Option<String>) {
        self.bearer_token = token;
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `X-API-Key` always; `Authorization: Bearer ...` when a token is set.
    pub(crate) fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&self.api_key) {
            Ok(v) => {
                headers.insert(API_KEY_HEADER, v);
            }
            Err(_) => warn!("API key contains characters invalid in a header; sending without it"),
        }
        if let Some(token) = &self.bearer_token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(v) => {
                    headers.insert(AUTHORIZATION, v);
                }
                Err(_) => warn!("bearer token invalid in a header; sending without it"),
            }
        }
        headers
    }

    pub(crate) async fn get(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<RawResponse, ClientError> {
        let url = self.url(path);
        debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .headers(self.auth_headers())
            .timeout(timeout)
            .send()
            .await?;
        RawResponse::receive(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<RawResponse, ClientError> {
        let url = self.url(path);
        debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .headers(self.auth_headers())
            .json(body)
            .timeout(timeout)
            .send()
            .await?;
        RawResponse::receive(response).await
    }

    /// Multipart POST. The multipart encoder sets its own content type, so
    /// only the auth headers are added here.
    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        timeout: Duration,
    ) -> Result<RawResponse, ClientError> {
        let url = self.url(path);
        debug!("POST {url} (multipart)");
        let response = self
            .http
            .post(&url)
            .headers(self.auth_headers())
            .multipart(form)
            .timeout(timeout)
            .send()
            .await?;
        RawResponse::receive(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::diagnostics::NullSink;

    fn client() -> ApiClient {
        ApiClient::with_sink(
            &ClientConfig::new("http://localhost:8000/", "test-key"),
            Arc::new(NullSink),
        )
    }

    #[test]
    fn test_url_joining_normalizes_slashes() {
        let c = client();
        assert_eq!(
            c.url("/api/optimize/resume"),
            "http://localhost:8000/api/optimize/resume"
        );
        assert_eq!(c.url("api/health"), "http://localhost:8000/api/health");
    }

    #[test]
    fn test_auth_headers_carry_api_key() {
        let headers = client().auth_headers();
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "test-key");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_auth_headers_carry_bearer_token_when_set() {
        let mut c = client();
        c.set_bearer_token(Some("jwt-abc".to_string()));
        let headers = c.auth_headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer jwt-abc");
    }

    #[test]
    fn test_timeouts_are_ordered_by_operation_cost() {
        assert!(DEFAULT_TIMEOUT < COVER_LETTER_TIMEOUT);
        assert!(COVER_LETTER_TIMEOUT < OPTIMIZE_TIMEOUT);
        assert!(OPTIMIZE_TIMEOUT < CV_GENERATE_TIMEOUT);
    }
}
