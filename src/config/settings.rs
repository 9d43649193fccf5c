//! Immutable routing settings.
//!
//! Built exactly once from [`RoutingConfig`] before the listener accepts
//! traffic, then shared read-only through an `Arc`.

use thiserror::Error;

use crate::config::schema::RoutingConfig;
use crate::routing::port::{BackendPort, InvalidPort};

/// Errors raised while building [`RoutingSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid socketio_port: {0}")]
    StreamingPort(#[from] InvalidPort),

    #[error("base_path must start with '/': {0:?}")]
    BasePath(String),

    #[error("failed to resolve local hostname: {0}")]
    Hostname(#[from] std::io::Error),

    #[error("local hostname is not valid UTF-8")]
    HostnameEncoding,
}

/// Routing state shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingSettings {
    /// Normalized base path: "" for root, otherwise "/x" without trailing '/'.
    base_path: String,
    streaming_port: Option<BackendPort>,
    hostname: String,
}

impl RoutingSettings {
    /// Capture the routing configuration.
    ///
    /// Falls back to the OS hostname when none is configured.
    pub fn init(config: &RoutingConfig) -> Result<Self, SettingsError> {
        let streaming_port = config
            .socketio_port
            .map(BackendPort::try_from)
            .transpose()?;

        let hostname = match &config.hostname {
            Some(name) => name.clone(),
            None => hostname::get()?
                .into_string()
                .map_err(|_| SettingsError::HostnameEncoding)?,
        };

        let settings = Self::new(&config.base_path, streaming_port, hostname)?;

        tracing::info!(
            base_path = %settings.base_path_display(),
            streaming_port = ?settings.streaming_port.map(|p| p.get()),
            hostname = %settings.hostname,
            "Routing settings initialized"
        );

        Ok(settings)
    }

    /// Build settings from already-validated parts.
    pub fn new(
        base_path: &str,
        streaming_port: Option<BackendPort>,
        hostname: impl Into<String>,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            base_path: normalize_base_path(base_path)?,
            streaming_port,
            hostname: hostname.into(),
        })
    }

    /// Application base path, "" when mounted at root.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Default port for `/socket.io/` requests, if configured.
    pub fn streaming_port(&self) -> Option<BackendPort> {
        self.streaming_port
    }

    /// Hostname that host-embedded addressing must name.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    fn base_path_display(&self) -> &str {
        if self.base_path.is_empty() {
            "/"
        } else {
            &self.base_path
        }
    }
}

/// "" and "/" mean root; trailing slashes are dropped.
pub fn normalize_base_path(base_path: &str) -> Result<String, SettingsError> {
    if base_path.is_empty() {
        return Ok(String::new());
    }
    if !base_path.starts_with('/') {
        return Err(SettingsError::BasePath(base_path.to_string()));
    }
    Ok(base_path.trim_end_matches('/').to_string())
}
