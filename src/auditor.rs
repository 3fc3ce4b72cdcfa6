//! Shared core of both interceptor placements: render a record, hand it to
//! the sink, count it.

use serde::Serialize;
use std::sync::Arc;
use tracing::Level;

use crate::config::{CaptureConfig, RecordFormat, SinkConfig};
use crate::error::CaptureResult;
use crate::observability::metrics;
use crate::sink::AuditSink;

/// Cheap to clone; one instance is shared by every exchange.
#[derive(Clone)]
pub struct Auditor {
    sink: Arc<dyn AuditSink>,
    capture: Arc<CaptureConfig>,
    level: Level,
    action_format: RecordFormat,
    transport_format: RecordFormat,
}

impl Auditor {
    pub fn new(sink: Arc<dyn AuditSink>, capture: CaptureConfig, sink_config: &SinkConfig) -> Self {
        Self {
            sink,
            capture: Arc::new(capture),
            level: sink_config.level.parse().unwrap_or(Level::INFO),
            action_format: sink_config.action_format,
            transport_format: sink_config.transport_format,
        }
    }

    /// Auditor with default capture and sink settings.
    pub fn with_sink(sink: Arc<dyn AuditSink>) -> Self {
        Self::new(sink, CaptureConfig::default(), &SinkConfig::default())
    }

    pub fn capture(&self) -> &CaptureConfig {
        &self.capture
    }

    pub fn action_format(&self) -> RecordFormat {
        self.action_format
    }

    pub fn transport_format(&self) -> RecordFormat {
        self.transport_format
    }

    /// Serialize `record` and emit it. Nothing reaches the sink on failure.
    pub fn emit<T: Serialize>(&self, record: &T, format: RecordFormat, variant: &'static str) -> CaptureResult<()> {
        let text = match format {
            RecordFormat::Compact => serde_json::to_string(record)?,
            RecordFormat::Indented => serde_json::to_string_pretty(record)?,
        };
        self.sink.emit(self.level, &text);
        metrics::record_emitted(variant);
        Ok(())
    }
}

impl std::fmt::Debug for Auditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auditor")
            .field("level", &self.level)
            .field("action_format", &self.action_format)
            .field("transport_format", &self.transport_format)
            .finish_non_exhaustive()
    }
}
