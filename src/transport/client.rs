//! Outbound HTTP client with every exchange audited.
//!
//! There is no inbound connection here, so the caller address is always the
//! configured sentinel.

use axum::body::Body;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tower::Layer;

use crate::auditor::Auditor;
use crate::transport::layer::{MessageLoggingLayer, MessageLoggingService};

pub type AuditedClient = MessageLoggingService<Client<HttpConnector, Body>>;

/// Plain hyper-util client wrapped in the message logging layer.
pub fn audited_client(auditor: Auditor) -> AuditedClient {
    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    MessageLoggingLayer::new(auditor).layer(client)
}
