use thiserror::Error;

/// Client-level error type returned by all backend API operations.
///
/// A malformed 200 body that still decodes is NOT an error: it is
/// normalized into a default-valued success result instead (see
/// `recovery::normalize`). Only transport failures, non-200 statuses and
/// bodies that defeat every decode stage surface here.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-200 response. `message` carries the upstream `detail` field when
    /// the error body parses, otherwise a truncated body preview.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Body could not be interpreted as JSON after every recovery stage.
    /// `context` is a bounded window of text around the last parse error.
    #[error("invalid JSON in response at position {position}: ...{context}...")]
    DecodeFailed { position: usize, context: String },

    /// A 200 response whose body parsed but is missing fields the
    /// operation cannot proceed without (e.g. no `content` in a generated
    /// CV, undecodable base64).
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Client-side validation failed before any request was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(e) if e.is_timeout() => {
                "Request timed out. The server is taking too long to respond.".to_string()
            }
            ClientError::Transport(e) if e.is_connect() => {
                format!("Failed to connect to the server: {e}")
            }
            ClientError::Transport(e) => format!("Request failed: {e}"),
            ClientError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
