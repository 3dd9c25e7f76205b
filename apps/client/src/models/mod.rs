pub mod cv;
pub mod portfolio;

use serde::{Deserialize, Serialize};

/// Returned by every resume upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub resume_id: String,
}
