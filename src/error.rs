//! Error types for the capture hooks.

use thiserror::Error;

/// Failure inside one of the audit hooks.
///
/// None of these reach the API caller: the middleware logs them and lets the
/// exchange continue.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The host pipeline did not attach a request id before the action hook.
    #[error("no correlation token on request (is the request-id layer installed?)")]
    MissingCorrelationId,

    /// Arguments or the record itself could not be serialized.
    #[error("failed to serialize capture record: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type CaptureResult<T> = Result<T, CaptureError>;
