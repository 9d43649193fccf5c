//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Validate addresses and URLs before anything binds or connects
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::routing::port::BackendPort;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("routing.base_path {0:?} must be empty or start with '/'")]
    BasePath(String),

    #[error("routing.socketio_port {0} is outside 1..=65535")]
    SocketioPort(u32),

    #[error("routing.hostname must not be empty")]
    EmptyHostname,

    #[error("upstream.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("fallback.address {0:?} must be an absolute http:// URL")]
    FallbackAddress(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),

    #[error("observability.log_format {0:?} is not one of full, compact, pretty")]
    LogFormat(String),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let routing = &config.routing;
    if !routing.base_path.is_empty() && !routing.base_path.starts_with('/') {
        errors.push(ValidationError::BasePath(routing.base_path.clone()));
    }
    if let Some(port) = routing.socketio_port {
        if BackendPort::try_from(port).is_err() {
            errors.push(ValidationError::SocketioPort(port));
        }
    }
    if matches!(&routing.hostname, Some(h) if h.trim().is_empty()) {
        errors.push(ValidationError::EmptyHostname);
    }

    if config.upstream.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_ms"));
    }
    if config.upstream.response_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("response_timeout_secs"));
    }

    if let Some(address) = &config.fallback.address {
        let valid = url::Url::parse(address)
            .map(|u| u.scheme() == "http" && u.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::FallbackAddress(address.clone()));
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(observability.metrics_address.clone()));
    }
    if !matches!(observability.log_format.as_str(), "full" | "compact" | "pretty") {
        errors.push(ValidationError::LogFormat(observability.log_format.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
