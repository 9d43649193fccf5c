//! Timeout enforcement.
//!
//! # Responsibilities
//! - Derive connect and response deadlines from configuration
//! - Wrap upstream calls with a deadline
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors, but share the 500 reply
//! - Established tunnels and streaming bodies are not bounded

use std::future::Future;
use std::time::Duration;

use crate::config::UpstreamConfig;

/// Deadlines applied to every upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    /// TCP connect deadline.
    pub connect: Duration,
    /// Deadline for response headers (or the 101 of an upgrade).
    pub response: Duration,
}

impl UpstreamTimeouts {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            connect: Duration::from_millis(config.connect_timeout_ms),
            response: Duration::from_secs(config.response_timeout_secs),
        }
    }
}

impl Default for UpstreamTimeouts {
    fn default() -> Self {
        Self::from_config(&UpstreamConfig::default())
    }
}

/// Deadline exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub Duration);

/// Run `fut` with a deadline.
pub async fn with_deadline<F, T>(limit: Duration, fut: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| Elapsed(limit))
}
