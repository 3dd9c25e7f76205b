//! Response recovery: turns a possibly malformed optimization response body
//! into a well-formed result through a fixed cascade of decode repairs,
//! with failure context captured on a side channel for offline debugging.

pub mod decode;
pub mod diagnostics;
pub mod normalize;

pub use decode::{decode_recoverable, DecodeStage, Decoded};
pub use diagnostics::{DiagnosticSink, FileSink, NullSink};
pub use normalize::{normalize, OptimizationResult, ResultStatus};
