//! WebSocket (HTTP upgrade) proxy handling.
//!
//! # Responsibilities
//! - Detect upgrade requests
//! - Join the client and backend upgraded connections
//! - Relay bytes in both directions until either side closes
//!
//! # Data Flow
//! ```text
//! Client ←──── raw bytes ────→ Proxy ←──── raw bytes ────→ Backend
//! ```
//!
//! # Design Decisions
//! - The handshake itself goes through the regular forwarder
//! - Byte-level relay (no frame parsing), so any upgraded protocol works
//! - Both halves are dropped together when the relay ends

use axum::http::{header, HeaderMap};
use hyper::upgrade::OnUpgrade;
use hyper_util::rt::TokioIo;

use crate::observability::metrics;
use crate::routing::BackendPort;

/// True when the request asks for a protocol upgrade (`Connection: upgrade`).
pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
    let connection_upgrade = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));

    connection_upgrade && headers.contains_key(header::UPGRADE)
}

/// Relay an upgraded client connection to an upgraded backend connection.
pub async fn tunnel(
    client: OnUpgrade,
    upstream: OnUpgrade,
    port: Option<BackendPort>,
    request_id: String,
) {
    let (client, upstream) = match tokio::try_join!(client, upstream) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Upgrade failed");
            return;
        }
    };

    let mut client = TokioIo::new(client);
    let mut upstream = TokioIo::new(upstream);

    tracing::debug!(request_id = %request_id, port = ?port.map(|p| p.get()), "Tunnel established");
    metrics::tunnel_opened();

    match tokio::io::copy_bidirectional(&mut client, &mut upstream).await {
        Ok((from_client, from_upstream)) => {
            tracing::debug!(
                request_id = %request_id,
                from_client,
                from_upstream,
                "Tunnel closed"
            );
        }
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Tunnel closed with error");
        }
    }

    metrics::tunnel_closed();
}
