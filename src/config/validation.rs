//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AuditConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

use crate::config::schema::AuditConfig;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// One semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

pub fn validate_config(config: &AuditConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_request_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_request_body_bytes", "must be > 0"));
    }
    if config.capture.max_body_bytes == 0 {
        errors.push(ValidationError::new("capture.max_body_bytes", "must be > 0"));
    }
    if config.capture.fallback_ip.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::new(
            "capture.fallback_ip",
            format!("'{}' is not an ip address", config.capture.fallback_ip),
        ));
    }
    if !matches!(config.capture.default_scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::new("capture.default_scheme", "must be http or https"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }
    if !LEVELS.contains(&config.sink.level.as_str()) {
        errors.push(ValidationError::new("sink.level", format!("unknown level '{}'", config.sink.level)));
    }
    if !LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }
    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new("observability.log_format", "must be pretty or json"));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new("observability.metrics_address", "not a socket address"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&AuditConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = AuditConfig::default();
        config.capture.fallback_ip = "nowhere".into();
        config.capture.max_body_bytes = 0;
        config.sink.level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["capture.max_body_bytes", "capture.fallback_ip", "sink.level"]);
    }
}
