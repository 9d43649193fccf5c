//! Per-request routing decision.
//!
//! # Responsibilities
//! - Hold the shared, immutable routing settings
//! - Classify the request, then compute its forward target
//! - Return an explicit passthrough rather than a silent default
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pure: no I/O, so every decision is unit-testable

use std::sync::Arc;

use crate::config::RoutingSettings;
use crate::http::request::RequestView;
use crate::routing::classifier::is_reverse_proxy_request;
use crate::routing::port::BackendPort;
use crate::routing::rewrite::{compute_target, ForwardTarget, RoutingError};

/// Outcome of routing one request.
///
/// A passthrough never carries a port; a proxied decision always does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Not a backend request; forward `path` unmodified to the fallback.
    Passthrough { path: String },
    /// Forward to a backend port.
    Proxy(ForwardTarget),
}

impl RoutingDecision {
    pub fn is_proxied(&self) -> bool {
        matches!(self, RoutingDecision::Proxy(_))
    }

    pub fn target_port(&self) -> Option<BackendPort> {
        match self {
            RoutingDecision::Proxy(target) => Some(target.port),
            RoutingDecision::Passthrough { .. } => None,
        }
    }

    pub fn rewritten_path(&self) -> &str {
        match self {
            RoutingDecision::Proxy(target) => &target.rewritten_path,
            RoutingDecision::Passthrough { path } => path,
        }
    }
}

/// Routes requests to backend ports.
#[derive(Debug, Clone)]
pub struct Router {
    settings: Arc<RoutingSettings>,
}

impl Router {
    pub fn new(settings: Arc<RoutingSettings>) -> Self {
        Self { settings }
    }

    /// Returns true iff the request should be served by the reverse proxy.
    pub fn is_reverse_proxy_request(&self, request: &RequestView<'_>) -> bool {
        is_reverse_proxy_request(request, &self.settings)
    }

    /// Compute the forward target of an eligible request.
    pub fn compute_target(&self, request: &RequestView<'_>) -> Result<ForwardTarget, RoutingError> {
        compute_target(request, &self.settings)
    }

    /// Decide what to do with a request.
    pub fn decide(&self, request: &RequestView<'_>) -> Result<RoutingDecision, RoutingError> {
        if !self.is_reverse_proxy_request(request) {
            return Ok(RoutingDecision::Passthrough {
                path: request.url.to_string(),
            });
        }
        self.compute_target(request).map(RoutingDecision::Proxy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        let settings = RoutingSettings::new("/base", BackendPort::new(8081), "myhost").unwrap();
        Router::new(Arc::new(settings))
    }

    #[test]
    fn test_passthrough_carries_no_port() {
        let decision = router()
            .decide(&RequestView::new(Some("myhost"), "/tree?x=1", None))
            .unwrap();
        assert!(!decision.is_proxied());
        assert_eq!(decision.target_port(), None);
        assert_eq!(decision.rewritten_path(), "/tree?x=1");
    }

    #[test]
    fn test_proxied_carries_port() {
        let decision = router()
            .decide(&RequestView::new(None, "/_proxy/8080/notebooks/x.ipynb", None))
            .unwrap();
        assert!(decision.is_proxied());
        assert_eq!(decision.target_port().map(|p| p.to_string()), Some("8080".into()));
        assert_eq!(decision.rewritten_path(), "/base/notebooks/x.ipynb");
    }

    #[test]
    fn test_host_precedence() {
        let decision = router()
            .decide(&RequestView::new(Some("10-dot-myhost"), "/_proxy/20/foo", None))
            .unwrap();
        let RoutingDecision::Proxy(target) = decision else {
            panic!("expected proxied decision");
        };
        assert_eq!(target.port.get(), 10);
        assert_eq!(target.rewritten_path, "/_proxy/20/foo");
    }

    #[test]
    fn test_streaming_default() {
        let decision = router()
            .decide(&RequestView::new(None, "/socket.io/?EIO=3", None))
            .unwrap();
        assert_eq!(decision.target_port().map(|p| p.get()), Some(8081));
    }
}
