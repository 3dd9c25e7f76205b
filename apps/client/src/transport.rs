//! Raw HTTP response handling shared by every endpoint: body capture,
//! status-to-error mapping and upload MIME detection.

use std::collections::HashMap;
use std::path::Path;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ClientError;

/// How much of a non-JSON error body survives into the error message.
const ERROR_BODY_PREVIEW_CHARS: usize = 500;

/// A fully received HTTP response. Immutable once constructed; the body is
/// held both as bytes (for hex dumps and binary downloads) and as lossily
/// decoded text (for JSON parsing).
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body_text: String,
    pub body_bytes: Bytes,
}

impl RawResponse {
    /// Drains a `reqwest::Response` into an owned value.
    pub async fn receive(response: reqwest::Response) -> Result<Self, ClientError> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body_bytes = response.bytes().await?;
        let body_text = String::from_utf8_lossy(&body_bytes).into_owned();
        Ok(RawResponse {
            status,
            headers,
            body_text,
            body_bytes,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Maps a non-200 response to `ClientError::Http`. The message prefers
    /// an upstream-provided `detail` field when the error body parses as
    /// JSON, falling back to a truncated body preview.
    pub fn error_for_status(&self) -> Result<(), ClientError> {
        if self.is_success() {
            return Ok(());
        }
        Err(ClientError::Http {
            status: self.status,
            message: error_message(self.status, &self.body_text),
        })
    }

    /// Checks the status, then parses the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        self.error_for_status()?;
        serde_json::from_str(&self.body_text)
            .map_err(|e| ClientError::MalformedResponse(format!("Invalid JSON response: {e}")))
    }
}

/// Human-readable message for a non-200 body.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        match parsed.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(other) if !other.is_null() => return other.to_string(),
            _ => {}
        }
    }
    format!(
        "HTTP {status}: {}",
        truncate_chars(body, ERROR_BODY_PREVIEW_CHARS)
    )
}

/// First `limit` characters of `s`, whole characters only.
pub(crate) fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// MIME type for an uploaded resume, keyed by file extension.
pub(crate) fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
