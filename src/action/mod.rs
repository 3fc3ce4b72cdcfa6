//! Action-boundary interceptor.
//!
//! # Data Flow
//! ```text
//! request (routed, request id attached)
//!     → context.rs (ExchangeContext: correlation id + caller, created once)
//!     → body buffered once, arguments bound (arguments.rs)
//!     → interceptor.rs on_request_enter  → RequestRecord  → sink
//!     → handler (sees the full body and the bound arguments)
//!     → interceptor.rs on_response_exit  → ResponseRecord → sink
//! ```
//!
//! # Design Decisions
//! - The two records are joined downstream by `correlationId`
//! - Hook failures are logged and counted, never turned into responses
//! - If the exchange is cancelled before the handler returns, no response
//!   record is written

pub mod arguments;
pub mod context;
pub mod interceptor;
pub mod middleware;

pub use arguments::ActionArguments;
pub use context::ExchangeContext;
pub use interceptor::{ActionAuditor, ActionRequest};
pub use middleware::action_audit_middleware;
