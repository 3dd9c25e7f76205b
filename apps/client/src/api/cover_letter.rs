//! Cover letter endpoints: resume upload and generation.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{ApiClient, COVER_LETTER_TIMEOUT, DEFAULT_TIMEOUT};
use crate::errors::ClientError;
use crate::models::UploadResponse;
use crate::transport::mime_for_path;

/// Payload for POST /api/cover-letter/legacy-generate.
#[derive(Debug, Clone, Serialize)]
pub struct CoverLetterRequest {
    pub resume_text: String,
    pub job_description: String,
    pub tone: String,
}

impl CoverLetterRequest {
    /// A missing or blank tone defaults to "professional"; the backend
    /// matches tones lowercase.
    pub fn new(resume_text: &str, job_description: &str, tone: Option<&str>) -> Self {
        let tone = tone
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("professional");
        CoverLetterRequest {
            resume_text: resume_text.to_string(),
            job_description: job_description.to_string(),
            tone: tone.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverLetterResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiClient {
    /// POST /api/cover-letter/upload-resume (multipart)
    pub async fn upload_cover_letter_resume(
        &self,
        path: &Path,
    ) -> Result<UploadResponse, ClientError> {
        self.upload_resume_to("/api/cover-letter/upload-resume", path)
            .await
    }

    /// POST /api/cover-letter/legacy-generate
    ///
    /// Both text fields are validated client-side before anything is sent;
    /// the backend rejects blank input with a less helpful message.
    pub async fn generate_cover_letter(
        &self,
        request: &CoverLetterRequest,
    ) -> Result<CoverLetterResponse, ClientError> {
        if request.resume_text.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "Missing required field: resume_text".to_string(),
            ));
        }
        if request.job_description.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "Missing required field: job_description".to_string(),
            ));
        }
        info!(
            "sending cover letter generation request (resume {} chars, tone {})",
            request.resume_text.len(),
            request.tone
        );
        let raw = self
            .post_json(
                "/api/cover-letter/legacy-generate",
                request,
                COVER_LETTER_TIMEOUT,
            )
            .await?;
        raw.json()
    }

    /// Shared multipart resume upload used by the cover letter and
    /// portfolio flows.
    pub(crate) async fn upload_resume_to(
        &self,
        endpoint: &str,
        path: &Path,
    ) -> Result<UploadResponse, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::InvalidRequest(format!("Failed to read {}: {e}", path.display()))
        })?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume")
            .to_string();
        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime_for_path(path))?;
        let form = Form::new().part("file", part);
        let raw = self.post_multipart(endpoint, form, DEFAULT_TIMEOUT).await?;
        raw.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_defaults_to_professional() {
        assert_eq!(CoverLetterRequest::new("r", "jd", None).tone, "professional");
        assert_eq!(
            CoverLetterRequest::new("r", "jd", Some("  ")).tone,
            "professional"
        );
    }

    #[test]
    fn test_tone_is_lowercased() {
        assert_eq!(
            CoverLetterRequest::new("r", "jd", Some("Enthusiastic")).tone,
            "enthusiastic"
        );
    }

    #[test]
    fn test_request_serializes_all_fields() {
        let req = CoverLetterRequest::new("my resume", "the job", Some("formal"));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["resume_text"], "my resume");
        assert_eq!(value["job_description"], "the job");
        assert_eq!(value["tone"], "formal");
    }

    #[test]
    fn test_response_tolerates_sparse_bodies() {
        let resp: CoverLetterResponse =
            serde_json::from_str(r#"{"status": "success", "cover_letter": "Dear team,"}"#).unwrap();
        assert_eq!(resp.status, "success");
        assert_eq!(resp.cover_letter.as_deref(), Some("Dear team,"));
        assert_eq!(resp.message, None);
    }
}
