//! Sink writing records as `tracing` events on the `audit` target.

use tracing::Level;

use super::AuditSink;

/// Target used for every record, so subscribers can route audit lines separately.
pub const AUDIT_TARGET: &str = "audit";

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn emit(&self, level: Level, record: &str) {
        // event! needs a constant level
        match level {
            Level::ERROR => tracing::error!(target: AUDIT_TARGET, "{record}"),
            Level::WARN => tracing::warn!(target: AUDIT_TARGET, "{record}"),
            Level::INFO => tracing::info!(target: AUDIT_TARGET, "{record}"),
            Level::DEBUG => tracing::debug!(target: AUDIT_TARGET, "{record}"),
            _ => tracing::trace!(target: AUDIT_TARGET, "{record}"),
        }
    }
}
