//! Per-exchange context shared by the two action hooks.

use axum::http::request::Parts;
use std::time::Instant;
use tower_http::request_id::RequestId;

use crate::capture::extract::caller_ip;
use crate::config::CaptureConfig;
use crate::error::{CaptureError, CaptureResult};

const X_REQUEST_ID: &str = "x-request-id";

/// Identity of one exchange, created once when the request enters the
/// pipeline and passed explicitly to both hooks.
///
/// It is also stored in the request extensions so handlers can log with the
/// same correlation id.
#[derive(Debug, Clone)]
pub struct ExchangeContext {
    correlation_id: String,
    caller_ip: String,
    started: Instant,
}

impl ExchangeContext {
    /// Read the pipeline's correlation token and resolve the caller.
    ///
    /// The token is never invented here: without a request id set upstream
    /// this fails with [`CaptureError::MissingCorrelationId`].
    pub fn begin(parts: &Parts, config: &CaptureConfig) -> CaptureResult<Self> {
        let correlation_id = correlation_token(parts).ok_or(CaptureError::MissingCorrelationId)?;
        Ok(Self {
            correlation_id,
            caller_ip: caller_ip(parts, config),
            started: Instant::now(),
        })
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn caller_ip(&self) -> &str {
        &self.caller_ip
    }

    pub fn started(&self) -> Instant {
        self.started
    }
}

/// Request id attached by `SetRequestIdLayer`, falling back to the raw header.
fn correlation_token(parts: &Parts) -> Option<String> {
    let value = parts
        .extensions
        .get::<RequestId>()
        .map(RequestId::header_value)
        .or_else(|| parts.headers.get(X_REQUEST_ID))?;
    value
        .to_str()
        .ok()
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
