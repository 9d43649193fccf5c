//! Proxy eligibility.
//!
//! # Responsibilities
//! - Decide whether a request belongs to a backend at all
//! - Report which addressing convention named the port
//!
//! # Design Decisions
//! - Fixed priority: host > path > referrer > streaming default
//! - Host-embedded addressing wins so that requests already redirected to a
//!   per-backend origin never re-trigger path rewriting

use std::fmt;

use crate::config::RoutingSettings;
use crate::http::request::RequestView;
use crate::routing::port::{port_from_host, port_from_path, BackendPort, PortMatch};

/// Path prefix of the streaming sub-protocol.
pub const STREAMING_PREFIX: &str = "/socket.io/";

/// Where a request's backend port came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSource {
    Host,
    Path,
    Referer,
    StreamingDefault,
}

impl PortSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PortSource::Host => "host",
            PortSource::Path => "path",
            PortSource::Referer => "referer",
            PortSource::StreamingDefault => "streaming_default",
        }
    }
}

impl fmt::Display for PortSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true iff the request should be served by the reverse proxy.
pub fn is_reverse_proxy_request(request: &RequestView<'_>, settings: &RoutingSettings) -> bool {
    classify(request, settings).is_some()
}

/// Resolve the port with the full priority order, host first.
pub fn classify(
    request: &RequestView<'_>,
    settings: &RoutingSettings,
) -> Option<(PortSource, BackendPort)> {
    if let PortMatch::Found(port) = port_from_host(request.host, settings.hostname()) {
        return Some((PortSource::Host, port));
    }
    request_port(request, settings)
}

/// Resolve the port from path, referrer or streaming default, ignoring the host.
pub fn request_port(
    request: &RequestView<'_>,
    settings: &RoutingSettings,
) -> Option<(PortSource, BackendPort)> {
    if let PortMatch::Found(port) = port_from_path(Some(request.path)) {
        return Some((PortSource::Path, port));
    }
    if let PortMatch::Found(port) = port_from_path(request.referer) {
        return Some((PortSource::Referer, port));
    }
    if request.path.starts_with(STREAMING_PREFIX) {
        return settings
            .streaming_port()
            .map(|port| (PortSource::StreamingDefault, port));
    }
    None
}
