//! Log sinks receiving serialized capture records.
//!
//! The sink is fire-and-forget from the interceptor's point of view: it takes
//! one fully rendered record and a level, and reports nothing back.

pub mod memory;
pub mod tracing_sink;

use tracing::Level;

pub use memory::MemorySink;
pub use tracing_sink::TracingSink;

/// Append-only destination for serialized records.
pub trait AuditSink: Send + Sync {
    fn emit(&self, level: Level, record: &str);
}
