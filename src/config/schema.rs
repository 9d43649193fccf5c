//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the reverse proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Port addressing and URL rewriting.
    pub routing: RoutingConfig,

    /// Upstream connection bounds.
    pub upstream: UpstreamConfig,

    /// Where non-proxied requests go.
    pub fallback: FallbackConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Routing configuration, consumed once by `RoutingSettings::init`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Application base path prefixed to rewritten paths ("/" for root).
    pub base_path: String,

    /// Default backend port for `/socket.io/` requests without an explicit port.
    pub socketio_port: Option<u32>,

    /// Hostname that host-embedded addressing must name.
    /// Defaults to the OS hostname.
    pub hostname: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            socketio_port: None,
            hostname: None,
        }
    }
}

/// Upstream (backend) connection bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Time allowed for the backend to produce response headers, in seconds.
    pub response_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            response_timeout_secs: 60,
        }
    }
}

/// Passthrough target for requests that are not proxy-eligible.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FallbackConfig {
    /// Base URL of the application server (e.g., "http://127.0.0.1:8081").
    /// Without it, non-proxied requests get 404.
    pub address: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format (full, compact, pretty).
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
            log_format: "full".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.routing.base_path, "/");
        assert!(config.routing.socketio_port.is_none());
        assert!(config.fallback.address.is_none());
        assert_eq!(config.upstream.connect_timeout_ms, 5_000);
    }

    #[test]
    fn test_partial_sections() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [routing]
            base_path = "/datalab"
            socketio_port = 8081

            [observability]
            log_format = "compact"
            "#,
        )
        .unwrap();
        assert_eq!(config.routing.base_path, "/datalab");
        assert_eq!(config.routing.socketio_port, Some(8081));
        assert_eq!(config.observability.log_format, "compact");
        assert_eq!(config.observability.log_level, "info");
    }
}
