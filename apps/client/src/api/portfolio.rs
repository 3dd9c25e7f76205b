//! Portfolio endpoints: resume upload, AI-assisted section authoring,
//! generation, preview and download. These are plain pass-throughs; only
//! the optimize call (see `api::optimize`) needs response recovery.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::api::{ApiClient, DEFAULT_TIMEOUT};
use crate::errors::ClientError;
use crate::models::portfolio::{EnhanceRequest, GeneratedPortfolio, PortfolioRequest};
use crate::models::UploadResponse;

impl ApiClient {
    /// POST /api/portfolio/upload-resume (multipart)
    pub async fn upload_portfolio_resume(
        &self,
        path: &Path,
    ) -> Result<UploadResponse, ClientError> {
        self.upload_resume_to("/api/portfolio/upload-resume", path)
            .await
    }

    /// GET /api/resumes/{id}
    pub async fn get_resume_data(&self, resume_id: &str) -> Result<Value, ClientError> {
        if resume_id.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "No resume ID provided".to_string(),
            ));
        }
        let raw = self
            .get(&format!("/api/resumes/{resume_id}"), DEFAULT_TIMEOUT)
            .await?;
        raw.json()
    }

    /// POST /api/portfolio/generate
    pub async fn generate_portfolio(
        &self,
        request: &PortfolioRequest,
    ) -> Result<GeneratedPortfolio, ClientError> {
        info!(
            "sending portfolio generation request (resume {}, template {})",
            request.resume_id, request.template
        );
        let raw = self
            .post_json("/api/portfolio/generate", request, DEFAULT_TIMEOUT)
            .await?;
        raw.json()
    }

    /// POST /api/portfolio/ai/enhance
    pub async fn enhance_section(&self, request: &EnhanceRequest) -> Result<Value, ClientError> {
        let raw = self
            .post_json("/api/portfolio/ai/enhance", request, DEFAULT_TIMEOUT)
            .await?;
        raw.json()
    }

    /// POST /api/portfolio/ai/suggest-sections
    pub async fn suggest_sections(&self, resume_data: &Value) -> Result<Value, ClientError> {
        let raw = self
            .post_json(
                "/api/portfolio/ai/suggest-sections",
                &serde_json::json!({ "resume_data": resume_data }),
                DEFAULT_TIMEOUT,
            )
            .await?;
        raw.json()
    }

    /// GET /api/portfolio/preview/{id}
    pub async fn get_portfolio_preview(&self, portfolio_id: &str) -> Result<Value, ClientError> {
        let raw = self
            .get(
                &format!("/api/portfolio/preview/{portfolio_id}"),
                DEFAULT_TIMEOUT,
            )
            .await?;
        raw.json()
    }

    /// GET /api/portfolio/download/{id}?format=...
    pub async fn download_portfolio(
        &self,
        portfolio_id: &str,
        format: &str,
    ) -> Result<Value, ClientError> {
        let raw = self
            .get(
                &format!("/api/portfolio/download/{portfolio_id}?format={format}"),
                DEFAULT_TIMEOUT,
            )
            .await?;
        raw.json()
    }

    /// GET /api/portfolio/questions
    pub async fn portfolio_questions(&self) -> Result<Value, ClientError> {
        let raw = self.get("/api/portfolio/questions", DEFAULT_TIMEOUT).await?;
        raw.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_resume_id_rejected_before_sending() {
        let client = ApiClient::with_sink(
            &crate::config::ClientConfig::new("http://localhost:8000", "test-key"),
            std::sync::Arc::new(crate::recovery::diagnostics::NullSink),
        );
        let err = client.get_resume_data("  ").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }
}
