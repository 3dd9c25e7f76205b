//! Resume optimization. This is the one call whose response runs the full
//! recovery pipeline (cascading decode, then normalization) before
//! anything reaches the caller, because the backend relays LLM output
//! that is not always clean JSON.

use serde::Serialize;
use tracing::{debug, error, info};

use crate::api::{ApiClient, OPTIMIZE_TIMEOUT};
use crate::errors::ClientError;
use crate::recovery::decode::decode_recoverable;
use crate::recovery::diagnostics::DiagnosticSink;
use crate::recovery::normalize::{normalize, OptimizationResult};
use crate::transport::RawResponse;

#[derive(Debug, Serialize)]
struct OptimizeRequest<'a> {
    resume_text: &'a str,
}

impl ApiClient {
    /// Optimizes a resume against ATS best practices.
    ///
    /// Always returns a structurally valid result: transport and HTTP
    /// failures come back as error-status results with a readable message,
    /// and any 200 response that survives decoding is normalized into a
    /// usable success result, however malformed its fields were.
    pub async fn optimize_resume(&self, resume_text: &str) -> OptimizationResult {
        info!(
            "sending resume optimization request ({} chars)",
            resume_text.len()
        );
        let raw = match self
            .post_json(
                "/api/optimize/resume",
                &OptimizeRequest { resume_text },
                OPTIMIZE_TIMEOUT,
            )
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                error!("resume optimization request failed: {e}");
                return OptimizationResult::error(optimize_error_message(&e));
            }
        };
        debug!("optimization response: HTTP {}", raw.status);

        match handle_optimize_response(&raw, resume_text, self.sink.as_ref()) {
            Ok(result) => {
                info!("optimization succeeded, score {}", result.score);
                result
            }
            Err(e) => {
                error!("resume optimization failed: {e}");
                OptimizationResult::error(optimize_error_message(&e))
            }
        }
    }
}

/// Status check, recoverable decode, then normalization. Split out from
/// the request path so the whole response handling chain is testable
/// against hand-built responses.
fn handle_optimize_response(
    raw: &RawResponse,
    resume_text: &str,
    sink: &dyn DiagnosticSink,
) -> Result<OptimizationResult, ClientError> {
    raw.error_for_status()?;
    let decoded = decode_recoverable(&raw.body_text, &raw.body_bytes, sink)
        .map_err(|f| ClientError::DecodeFailed {
            position: f.position,
            context: f.context,
        })?;
    debug!("optimization response decoded via {:?}", decoded.stage);
    Ok(normalize(&decoded.value, resume_text))
}

/// The optimize call knows its own timeout, so its timeout message can say
/// how long the caller actually waited.
fn optimize_error_message(e: &ClientError) -> String {
    match e {
        ClientError::Transport(inner) if inner.is_timeout() => format!(
            "Request timed out after {} seconds. The server is taking too long to respond.",
            OPTIMIZE_TIMEOUT.as_secs()
        ),
        other => other.user_message(),
    }
}
