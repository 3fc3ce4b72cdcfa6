//! The two action hooks.
//!
//! `on_request_enter` runs after routing and argument binding, before the
//! handler; `on_response_exit` runs once the handler produced its response.
//! Each emits its own record; both carry the context's correlation id.

use axum::http::request::Parts;
use chrono::Utc;

use crate::action::arguments::ActionArguments;
use crate::action::context::ExchangeContext;
use crate::auditor::Auditor;
use crate::capture::extract::{request_side, BodyCapture};
use crate::capture::record::{RequestRecord, ResponseRecord, ResponseSide};
use crate::config::CaptureConfig;
use crate::error::CaptureResult;
use crate::observability::metrics;

const VARIANT: &str = "action";

/// What the request hook observes: the parsed request, its buffered body and
/// the arguments bound from them.
#[derive(Debug, Clone, Copy)]
pub struct ActionRequest<'a> {
    pub parts: &'a Parts,
    pub body: &'a BodyCapture,
    pub arguments: &'a ActionArguments,
}

#[derive(Debug, Clone)]
pub struct ActionAuditor {
    auditor: Auditor,
}

impl ActionAuditor {
    pub fn new(auditor: Auditor) -> Self {
        Self { auditor }
    }

    pub fn capture(&self) -> &CaptureConfig {
        self.auditor.capture()
    }

    /// Emit the request record.
    ///
    /// Format and arguments are recorded whenever the request has a body, the
    /// body text only when it was captured.
    pub fn on_request_enter(&self, context: &ExchangeContext, request: &ActionRequest<'_>) -> CaptureResult<()> {
        let request_arguments = if request.body.is_present() {
            Some(request.arguments.to_json()?)
        } else {
            None
        };

        let mut side = request_side(request.parts, request.body, self.auditor.capture());
        side.ip_address = context.caller_ip().to_string();

        let record = RequestRecord {
            correlation_id: context.correlation_id().to_string(),
            request: side,
            request_arguments,
        };
        self.auditor.emit(&record, self.auditor.action_format(), VARIANT)
    }

    /// Emit the response record. Without a response only the id and time are recorded.
    pub fn on_response_exit(&self, context: &ExchangeContext, response: Option<ResponseSide>) -> CaptureResult<()> {
        let record = ResponseRecord {
            correlation_id: context.correlation_id().to_string(),
            response_time: Utc::now(),
            response,
        };
        self.auditor.emit(&record, self.auditor.action_format(), VARIANT)?;
        metrics::record_exchange_duration(VARIANT, context.started());
        Ok(())
    }
}
