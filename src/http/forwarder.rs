//! Upstream forwarding.
//!
//! # Responsibilities
//! - Send the (rewritten) request to the backend over a pooled client
//! - Stream the backend response back without buffering
//! - Hand upgraded connections to the tunnel
//! - Bound connect and response time
//!
//! # Design Decisions
//! - Returns `ForwardError` instead of writing error responses; the server
//!   turns it into the single 500 reply
//! - No retries
//! - Dropping the returned future (client went away) drops the upstream connection

use std::time::Duration;

use axum::body::Body;
use axum::http::{uri::InvalidUri, Request, Response, StatusCode, Uri, Version};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::http::request::request_id;
use crate::http::websocket::{is_upgrade_request, tunnel};
use crate::resilience::{with_deadline, UpstreamTimeouts};
use crate::routing::{BackendPort, ForwardTarget};

/// Transport-level failures talking to a backend.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream uri: {0}")]
    InvalidUri(#[from] InvalidUri),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

impl ForwardError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::InvalidUri(_) => "invalid_uri",
            ForwardError::Upstream(e) if e.is_connect() => "connect",
            ForwardError::Upstream(_) => "upstream",
            ForwardError::Timeout(_) => "timeout",
        }
    }
}

/// Relays requests to backends.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    timeouts: UpstreamTimeouts,
}

impl Forwarder {
    pub fn new(timeouts: UpstreamTimeouts) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeouts.connect));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { client, timeouts }
    }

    /// Forward a request to a backend target.
    pub async fn forward(
        &self,
        request: Request<Body>,
        target: &ForwardTarget,
    ) -> Result<Response<Body>, ForwardError> {
        let uri: Uri = target.upstream_uri().parse()?;
        self.relay(request, uri, Some(target.port)).await
    }

    /// Send `request` to the absolute `uri` and return the upstream response.
    pub async fn relay(
        &self,
        mut request: Request<Body>,
        uri: Uri,
        port: Option<BackendPort>,
    ) -> Result<Response<Body>, ForwardError> {
        let request_id = request_id(&request);

        let client_upgrade = if is_upgrade_request(request.headers()) {
            Some(hyper::upgrade::on(&mut request))
        } else {
            None
        };

        let (mut parts, body) = request.into_parts();
        parts.uri = uri;
        parts.version = Version::HTTP_11;
        let upstream_request = Request::from_parts(parts, body);

        let upstream = self.client.request(upstream_request);
        let mut response = with_deadline(self.timeouts.response, upstream)
            .await
            .map_err(|elapsed| ForwardError::Timeout(elapsed.0))??;

        if let Some(client_upgrade) = client_upgrade {
            if response.status() == StatusCode::SWITCHING_PROTOCOLS {
                let upstream_upgrade = hyper::upgrade::on(&mut response);
                tokio::spawn(tunnel(client_upgrade, upstream_upgrade, port, request_id));
            } else {
                tracing::debug!(
                    request_id = %request_id,
                    status = %response.status(),
                    "Backend declined upgrade"
                );
            }
        }

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
