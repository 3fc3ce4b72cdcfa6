//! Capture record definitions.
//!
//! One exchange is observed twice: on the way in and on the way out. The
//! action boundary emits those halves as two records joined by
//! `correlationId`; the transport boundary merges them into one record that
//! is mutated in place and emitted once.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// All values recorded for one header name, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderEntry {
    pub name: String,
    pub values: Vec<String>,
}

/// Fields observed when the request arrives.
///
/// Shared by the split request record and the merged exchange record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSide {
    pub request_time: DateTime<Utc>,
    pub http_method: String,
    pub uri_accessed: String,
    pub ip_address: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub request_headers: Vec<HeaderEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_content: Option<String>,
}

/// Fields observed once a response exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSide {
    pub response_code: String,
    pub response_reason_phrase: String,
}

/// Request half of a split exchange (action boundary).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub correlation_id: String,
    #[serde(flatten)]
    pub request: RequestSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_arguments: Option<String>,
}

/// Response half of a split exchange (action boundary).
///
/// Without a response only the identifying fields are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub correlation_id: String,
    pub response_time: DateTime<Utc>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSide>,
}

/// Merged record for one exchange (transport boundary).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRecord {
    pub correlation_id: String,
    #[serde(flatten)]
    pub request: RequestSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<DateTime<Utc>>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSide>,
}

impl ExchangeRecord {
    pub fn new(correlation_id: String, request: RequestSide) -> Self {
        Self {
            correlation_id,
            request,
            response_time: None,
            response: None,
        }
    }

    /// Stamp the response time and, if there is one, the response fields.
    pub fn complete(&mut self, response: Option<ResponseSide>) {
        self.response_time = Some(Utc::now());
        self.response = response;
    }
}
