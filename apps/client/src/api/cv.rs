//! CV generation and download. Generated documents travel base64-encoded
//! inside the JSON response and are decoded into a `CvArtifact` here.

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use tracing::{debug, info};

use crate::api::{ApiClient, CV_GENERATE_TIMEOUT, DEFAULT_TIMEOUT};
use crate::errors::ClientError;
use crate::models::cv::CvGenerationRequest;

/// Wire shape of POST /api/cv/generate's response.
#[derive(Debug, Clone, Deserialize)]
struct CvGenerateResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    cv_id: Option<String>,
    /// Base64-encoded document.
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// A generated CV document, decoded and ready to write to disk.
#[derive(Debug, Clone)]
pub struct CvArtifact {
    pub cv_id: Option<String>,
    pub content: Vec<u8>,
    pub content_type: String,
    pub filename: String,
    pub format: String,
}

impl ApiClient {
    /// POST /api/cv/generate
    pub async fn generate_cv(
        &self,
        request: &CvGenerationRequest,
    ) -> Result<CvArtifact, ClientError> {
        info!(
            "sending CV generation request ({} positions, format {})",
            request.work_experience.len(),
            request.format
        );
        let raw = self
            .post_json("/api/cv/generate", request, CV_GENERATE_TIMEOUT)
            .await?;
        debug!("CV generation response: HTTP {}", raw.status);
        let response: CvGenerateResponse = raw.json()?;
        artifact_from_response(response, &request.format)
    }

    /// GET /api/cv/download/{id}
    ///
    /// The download endpoint streams the document directly; the filename
    /// extension is inferred from the Content-Type header.
    pub async fn download_cv(&self, cv_id: &str) -> Result<CvArtifact, ClientError> {
        let raw = self
            .get(&format!("/api/cv/download/{cv_id}"), DEFAULT_TIMEOUT)
            .await?;
        raw.error_for_status()?;
        let content_type = raw
            .headers
            .get("content-type")
            .cloned()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let ext = extension_for_content_type(&content_type);
        debug!(
            "downloaded CV {cv_id}: {} bytes, {content_type}",
            raw.body_bytes.len()
        );
        Ok(CvArtifact {
            cv_id: Some(cv_id.to_string()),
            content: raw.body_bytes.to_vec(),
            content_type,
            filename: format!("cv_{cv_id}.{ext}"),
            format: ext.to_string(),
        })
    }
}

/// Validates the generation response and decodes its base64 content.
fn artifact_from_response(
    response: CvGenerateResponse,
    requested_format: &str,
) -> Result<CvArtifact, ClientError> {
    if response.status != "success" {
        return Err(ClientError::MalformedResponse(
            response
                .message
                .unwrap_or_else(|| "Failed to generate CV".to_string()),
        ));
    }
    let encoded = response.content.ok_or_else(|| {
        ClientError::MalformedResponse("CV generation response carried no content".to_string())
    })?;
    let content = general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| ClientError::MalformedResponse(format!("Failed to process CV content: {e}")))?;
    debug!("decoded CV content, {} bytes", content.len());
    Ok(CvArtifact {
        cv_id: response.cv_id,
        content,
        content_type: response
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        filename: response
            .filename
            .unwrap_or_else(|| format!("cv.{requested_format}")),
        format: response
            .format
            .unwrap_or_else(|| requested_format.to_string()),
    })
}

/// Filename extension inferred from a Content-Type header.
fn extension_for_content_type(content_type: &str) -> &'static str {
    if content_type.contains("pdf") {
        "pdf"
    } else if content_type.contains("word")
        || content_type.contains("officedocument.wordprocessingml")
    {
        "docx"
    } else if content_type.contains("markdown") || content_type.contains("text/plain") {
        "md"
    } else {
        "bin"
    }
}
