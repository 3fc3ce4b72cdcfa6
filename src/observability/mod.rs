//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Interceptors and server produce:
//!     → logging.rs (structured log events, audit records on target "audit")
//!     → metrics.rs (emitted records, capture failures, exchange latency)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
