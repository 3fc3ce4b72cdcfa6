//! Transport-boundary interceptor.
//!
//! # Data Flow
//! ```text
//! Request<Body>
//!     → layer.rs: new UUID, request fields captured, body buffered and re-attached
//!     → inner service (router or outbound client), awaited
//!     → same record completed with the response
//!     → emitted once to the sink
//!     → Response returned unchanged
//! ```
//!
//! Per exchange: Created → RequestCaptured → AwaitingResponse → ResponseCaptured → Emitted

pub mod client;
pub mod layer;

pub use client::{audited_client, AuditedClient};
pub use layer::{CorrelationId, MessageLoggingLayer, MessageLoggingService};
