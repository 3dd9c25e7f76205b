//! Client for the PortfolioAI backend.
//!
//! Every backend endpoint is wrapped behind a typed call on [`ApiClient`].
//! Most of them are plain request/response glue; the resume optimization
//! call additionally runs its response through a recovery pipeline (see
//! [`recovery`]) that decodes near-JSON bodies through a fixed cascade of
//! repairs and normalizes whatever comes out into a stable result shape,
//! so callers always receive either an error with a message or a
//! structurally valid result.

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod recovery;
pub mod transport;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use errors::ClientError;
pub use recovery::normalize::{OptimizationResult, ResultStatus};
