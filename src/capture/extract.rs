//! Extraction of observable fields from request and response parts.
//!
//! # Responsibilities
//! - Resolve the caller address (connect info, trusted forwarding header, sentinel)
//! - Rebuild the absolute URI of server-side requests
//! - Group headers by name, preserving duplicates as multiple values
//! - Buffer the request body once and hand the same bytes back downstream
//!
//! # Design Decisions
//! - Everything here reads explicit request parts; no process-wide "current request"
//! - The body is read into an owned buffer and re-attached, so the business
//!   handler always sees the complete body
//! - A body is captured only if it fits in `max_body_bytes`; otherwise the
//!   bytes read so far are replayed ahead of the rest of the stream, unrecorded
//! - A read error is replayed the same way, so the handler's own extractor
//!   rejects the request as it would without auditing

use axum::{
    body::{Body, Bytes},
    extract::ConnectInfo,
    http::{header, request::Parts, HeaderMap, Response},
};
use chrono::Utc;
use futures_util::{stream, StreamExt};
use std::net::SocketAddr;
use tower::BoxError;
use url::Url;

use crate::capture::normalize::body_text;
use crate::capture::record::{HeaderEntry, RequestSide, ResponseSide};
use crate::config::CaptureConfig;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// What buffering found in the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BodyCapture {
    /// No body, or an empty one.
    #[default]
    Absent,
    /// Whole body, within the capture limit.
    Captured(Bytes),
    /// A body exists but was too large or failed while being read.
    Uncaptured,
}

impl BodyCapture {
    pub fn is_present(&self) -> bool {
        !matches!(self, BodyCapture::Absent)
    }

    pub fn bytes(&self) -> Option<&Bytes> {
        match self {
            BodyCapture::Captured(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Build the request-side fields of a record.
///
/// The media type is recorded whenever the request has a body; the body text
/// only when it was captured.
pub fn request_side(parts: &Parts, body: &BodyCapture, config: &CaptureConfig) -> RequestSide {
    let request_headers = if config.capture_headers {
        collect_headers(&parts.headers)
    } else {
        Vec::new()
    };

    RequestSide {
        request_time: Utc::now(),
        http_method: parts.method.to_string(),
        uri_accessed: absolute_uri(parts, config),
        ip_address: caller_ip(parts, config),
        request_headers,
        request_format: body.is_present().then(|| media_type(&parts.headers)).flatten(),
        body_content: body.bytes().map(|bytes| body_text(bytes)),
    }
}

/// Response code and reason phrase.
///
/// A reason phrase sent by the peer (hyper keeps it as an extension when it
/// differs from the canonical one) wins over the canonical phrase.
pub fn response_side<B>(response: &Response<B>) -> ResponseSide {
    let status = response.status();
    let reason = response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();

    ResponseSide {
        response_code: status.as_u16().to_string(),
        response_reason_phrase: reason,
    }
}

/// Caller address, or the configured sentinel when nothing identifies the caller.
pub fn caller_ip(parts: &Parts, config: &CaptureConfig) -> String {
    if config.trust_forwarded_for {
        let forwarded = parts
            .headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| config.fallback_ip.clone())
}

/// Absolute form of the request URI.
///
/// Client-side requests already carry scheme and authority. Server-side
/// requests usually only carry the path, so the authority comes from the
/// `Host` header. Without any authority the bare path is returned.
pub fn absolute_uri(parts: &Parts, config: &CaptureConfig) -> String {
    let uri = &parts.uri;
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let raw = match (uri.scheme_str(), uri.authority()) {
        (Some(_), Some(_)) => uri.to_string(),
        (_, authority) => {
            let host = authority
                .map(|a| a.as_str().to_string())
                .or_else(|| header_str(&parts.headers, header::HOST.as_str()).map(str::to_string));
            let Some(host) = host else {
                return path_and_query.to_string();
            };
            let scheme = uri
                .scheme_str()
                .or_else(|| {
                    config
                        .trust_forwarded_for
                        .then(|| header_str(&parts.headers, X_FORWARDED_PROTO))
                        .flatten()
                })
                .unwrap_or(config.default_scheme.as_str());
            format!("{scheme}://{host}{path_and_query}")
        }
    };

    Url::parse(&raw).map(String::from).unwrap_or(raw)
}

/// Declared media type of the body, without parameters.
pub fn media_type(headers: &HeaderMap) -> Option<String> {
    header_str(headers, header::CONTENT_TYPE.as_str())?
        .split(';')
        .next()
        .map(str::trim)
        .filter(|essence| !essence.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Headers grouped by name in first-seen order.
pub fn collect_headers(headers: &HeaderMap) -> Vec<HeaderEntry> {
    headers
        .keys()
        .map(|name| HeaderEntry {
            name: name.as_str().to_string(),
            values: headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect(),
        })
        .collect()
}

/// Read the body once and return a replacement body carrying the same bytes.
///
/// Never fails: anything that cannot be captured is handed downstream as it
/// arrived. A declared `Content-Length` over the limit skips reading entirely.
pub async fn buffer_body(headers: &HeaderMap, body: Body, max_body_bytes: usize) -> (Body, BodyCapture) {
    let declared = header_str(headers, header::CONTENT_LENGTH.as_str())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.is_some_and(|len| len > max_body_bytes as u64) {
        tracing::debug!(declared = ?declared, limit = max_body_bytes, "Body over capture limit, not captured");
        return (body, BodyCapture::Uncaptured);
    }

    let mut data = body.into_data_stream();
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut read = 0usize;

    while let Some(frame) = data.next().await {
        match frame {
            Ok(chunk) => {
                read += chunk.len();
                chunks.push(chunk);
                if read > max_body_bytes {
                    tracing::debug!(read, limit = max_body_bytes, "Streamed body over capture limit, not captured");
                    let rest = data.map(|frame| frame.map_err(axum::Error::into_inner));
                    return (Body::from_stream(replay(chunks).chain(rest)), BodyCapture::Uncaptured);
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, read, "Request body failed while buffering, not captured");
                let failed = stream::once(async move { Err(e.into_inner()) });
                return (Body::from_stream(replay(chunks).chain(failed)), BodyCapture::Uncaptured);
            }
        }
    }

    if read == 0 {
        return (Body::empty(), BodyCapture::Absent);
    }
    let bytes = if chunks.len() == 1 {
        chunks.remove(0)
    } else {
        Bytes::from(chunks.concat())
    };
    (Body::from(bytes.clone()), BodyCapture::Captured(bytes))
}

/// Chunks already read, as the head of a replacement body stream.
///
/// Errors travel unwrapped so the handler sees the same error source (for
/// example the length-limit error behind a 413) as without auditing.
fn replay(chunks: Vec<Bytes>) -> impl futures_util::Stream<Item = Result<Bytes, BoxError>> + Send + 'static {
    stream::iter(chunks.into_iter().map(Ok))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
