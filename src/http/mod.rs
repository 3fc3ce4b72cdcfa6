//! HTTP serving.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (trace, request id, body limit, timeout)
//!     → interceptor (action route layer or transport layer)
//!     → handlers.rs (items API)
//! ```

pub mod handlers;
pub mod server;

pub use server::AuditServer;
