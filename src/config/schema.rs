//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the audit
//! service. All types derive Serde traits for deserialization from config files.

use serde::Deserialize;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Listener configuration (bind address, request body limit).
    pub listener: ListenerConfig,

    /// What is captured and where the interceptor attaches.
    pub capture: CaptureConfig,

    /// How records are rendered and at which level they are emitted.
    pub sink: SinkConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest request body accepted at all, in bytes.
    pub max_request_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_request_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Pipeline placement of the interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuditMode {
    /// Split request/response records around the matched route.
    #[default]
    Action,
    /// One merged record per exchange around the whole service.
    Transport,
}

/// Capture settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub mode: AuditMode,

    /// Bodies larger than this, declared or streamed, are passed through uncaptured.
    pub max_body_bytes: usize,

    /// Record request headers.
    pub capture_headers: bool,

    /// Take caller ip and scheme from X-Forwarded-For / X-Forwarded-Proto.
    pub trust_forwarded_for: bool,

    /// Caller address recorded when none can be resolved.
    pub fallback_ip: String,

    /// Scheme used to rebuild absolute URIs of server-side requests.
    pub default_scheme: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            mode: AuditMode::default(),
            max_body_bytes: 64 * 1024,
            capture_headers: true,
            trust_forwarded_for: false,
            fallback_ip: "0.0.0.0".to_string(),
            default_scheme: "http".to_string(),
        }
    }
}

/// Rendering of a serialized record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    Compact,
    Indented,
}

/// Sink settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Format of split records (action boundary).
    pub action_format: RecordFormat,

    /// Format of merged records (transport boundary).
    pub transport_format: RecordFormat,

    /// Level records are emitted at (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            action_format: RecordFormat::Indented,
            transport_format: RecordFormat::Compact,
            level: "info".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// "pretty" for development, "json" for production.
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
