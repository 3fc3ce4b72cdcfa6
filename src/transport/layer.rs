//! Tower layer recording one merged record per exchange.
//!
//! # Responsibilities
//! - Generate a fresh correlation id (UUID v4) for every exchange
//! - Capture request fields and buffer the body before forwarding
//! - Complete the same record with the response and emit it exactly once
//!
//! # Design Decisions
//! - The response is returned untouched; errors from the inner service are
//!   propagated after the request-only record is emitted
//! - A drop guard covers cancellation: the request-only record is emitted
//!   once and no response fields are filled in

use axum::{
    body::Body,
    http::{Request, Response},
};
use futures_util::future::BoxFuture;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{BoxError, Layer, Service};
use uuid::Uuid;

use crate::auditor::Auditor;
use crate::capture::extract::{buffer_body, request_side, response_side};
use crate::capture::record::{ExchangeRecord, ResponseSide};
use crate::observability::metrics;

const VARIANT: &str = "transport";

/// Correlation id of the current exchange, left in the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

#[derive(Debug, Clone)]
pub struct MessageLoggingLayer {
    auditor: Auditor,
}

impl MessageLoggingLayer {
    pub fn new(auditor: Auditor) -> Self {
        Self { auditor }
    }
}

impl<S> Layer<S> for MessageLoggingLayer {
    type Service = MessageLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MessageLoggingService {
            inner,
            auditor: self.auditor.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageLoggingService<S> {
    inner: S,
    auditor: Auditor,
}

impl<S, ResBody> Service<Request<Body>> for MessageLoggingService<S>
where
    S: Service<Request<Body>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError>,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // the clone may not be ready; keep the one poll_ready was called on
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let auditor = self.auditor.clone();

        Box::pin(async move {
            let started = Instant::now();
            let correlation_id = Uuid::new_v4().to_string();
            let (mut parts, body) = request.into_parts();

            let (body, captured) = buffer_body(&parts.headers, body, auditor.capture().max_body_bytes).await;

            let side = request_side(&parts, &captured, auditor.capture());
            let mut pending = PendingRecord::new(auditor, ExchangeRecord::new(correlation_id.clone(), side));
            parts.extensions.insert(CorrelationId(correlation_id));

            let result = inner.call(Request::from_parts(parts, body)).await;

            match &result {
                Ok(response) => pending.complete(Some(response_side(response))),
                Err(_) => pending.complete(None),
            }
            pending.emit();
            metrics::record_exchange_duration(VARIANT, started);

            result.map_err(Into::<BoxError>::into)
        })
    }
}

/// Record waiting for its response. Emits at most once: explicitly, or on drop
/// when the exchange was cancelled.
struct PendingRecord {
    auditor: Auditor,
    record: Option<ExchangeRecord>,
}

impl PendingRecord {
    fn new(auditor: Auditor, record: ExchangeRecord) -> Self {
        Self {
            auditor,
            record: Some(record),
        }
    }

    fn complete(&mut self, response: Option<ResponseSide>) {
        if let Some(record) = self.record.as_mut() {
            record.complete(response);
        }
    }

    fn emit(mut self) {
        if let Some(record) = self.record.take() {
            write(&self.auditor, &record);
        }
    }
}

impl Drop for PendingRecord {
    fn drop(&mut self) {
        if let Some(record) = self.record.take() {
            tracing::debug!(correlation_id = %record.correlation_id, "Exchange cancelled before a response");
            write(&self.auditor, &record);
        }
    }
}

fn write(auditor: &Auditor, record: &ExchangeRecord) {
    if let Err(e) = auditor.emit(record, auditor.transport_format(), VARIANT) {
        tracing::error!(correlation_id = %record.correlation_id, error = %e, "Exchange capture failed");
        metrics::record_capture_failure("exchange");
    }
}
