//! HTTP exchange auditing.
//!
//! Records method, URI, caller, headers, body, timing and status of every
//! exchange and hands the structured record to a sink. Two placements:
//!
//! - [`action`]: axum route middleware; one record on entry, one on exit,
//!   joined by the pipeline's request id
//! - [`transport`]: tower layer; one merged record per exchange under a fresh UUID

pub mod action;
pub mod auditor;
pub mod capture;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod sink;
pub mod transport;

pub use action::{action_audit_middleware, ActionAuditor, ExchangeContext};
pub use auditor::Auditor;
pub use config::AuditConfig;
pub use error::CaptureError;
pub use http::AuditServer;
pub use lifecycle::Shutdown;
pub use sink::{AuditSink, MemorySink, TracingSink};
pub use transport::{MessageLoggingLayer, MessageLoggingService};
