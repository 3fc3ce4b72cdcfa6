//! In-memory sink.
//!
//! Keeps every emitted record in order. Used by the tests and by embedders
//! that forward records somewhere else themselves.

use std::sync::Mutex;
use tracing::Level;

use super::AuditSink;

#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records emitted so far.
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().expect("memory sink mutex poisoned").clone()
    }

    /// Emitted records parsed back into JSON values.
    pub fn json(&self) -> Vec<serde_json::Value> {
        self.records()
            .iter()
            .filter_map(|(_, record)| serde_json::from_str(record).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("memory sink mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemorySink {
    fn emit(&self, level: Level, record: &str) {
        self.records
            .lock()
            .expect("memory sink mutex poisoned")
            .push((level, record.to_string()));
    }
}
