//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener, shut down gracefully
//! - Dispatch requests to the routing engine
//! - Forward proxied requests to backends, others to the fallback
//! - Translate routing/forwarding errors into the single 500 reply

use axum::{
    body::Body,
    extract::State,
    http::{Request, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ProxyConfig, RoutingSettings, SettingsError};
use crate::http::forwarder::{ForwardError, Forwarder};
use crate::http::request::{request_id, RequestView, UuidRequestId};
use crate::http::response::not_found;
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics;
use crate::resilience::UpstreamTimeouts;
use crate::routing::{Router as ProxyRouter, RoutingDecision};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub forwarder: Forwarder,
    /// Base URL for non-proxied requests, without trailing '/'.
    pub fallback: Option<Arc<str>>,
}

/// HTTP server for the reverse proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Routing settings are initialized here, once, before any listener exists.
    pub fn new(config: ProxyConfig) -> Result<Self, SettingsError> {
        let settings = Arc::new(RoutingSettings::init(&config.routing)?);

        let state = AppState {
            router: Arc::new(ProxyRouter::new(settings)),
            forwarder: Forwarder::new(UpstreamTimeouts::from_config(&config.upstream)),
            fallback: config
                .fallback
                .address
                .as_deref()
                .map(|address| Arc::from(address.trim_end_matches('/'))),
        };

        let router = Self::build_router(state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until a shutdown signal or trigger arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The service, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Main proxy handler.
/// Routes the request, then forwards it to a backend or the fallback.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().to_string();

    let decision = state.router.decide(&RequestView::from_request(&request));

    let (route, result) = match decision {
        Ok(RoutingDecision::Proxy(target)) => {
            tracing::info!(
                request_id = %request_id,
                port = target.port.get(),
                source = %target.source,
                path = %target.rewritten_path,
                "Forwarding proxied request"
            );
            ("proxy", state.forwarder.forward(request, &target).await)
        }
        Ok(RoutingDecision::Passthrough { path }) => match state.fallback.as_deref() {
            Some(base) => {
                tracing::debug!(request_id = %request_id, path = %path, "Passing request through");
                ("passthrough", passthrough(&state.forwarder, base, &path, request).await)
            }
            None => {
                tracing::debug!(request_id = %request_id, path = %path, "Not a proxy request");
                let response = not_found();
                metrics::record_request(&method, response.status().as_u16(), "none", start_time);
                return response;
            }
        },
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                "Routing failed for eligible request"
            );
            let response = e.into_response();
            metrics::record_request(&method, response.status().as_u16(), "proxy", start_time);
            return response;
        }
    };

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(request_id = %request_id, route, error = %e, "Upstream error");
            metrics::record_upstream_error(e.kind());
            e.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), route, start_time);
    response
}

/// Relay a non-proxied request, unmodified, to the fallback server.
async fn passthrough(
    forwarder: &Forwarder,
    base: &str,
    path: &str,
    request: Request<Body>,
) -> Result<Response, ForwardError> {
    let uri: Uri = format!("{}{}", base, path).parse()?;
    forwarder.relay(request, uri, None).await
}
