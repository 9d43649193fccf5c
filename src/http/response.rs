//! Response handling and transformation.
//!
//! # Responsibilities
//! - Map routing and upstream errors to HTTP responses
//! - Keep internal topology (ports, addresses, causes) out of error bodies
//!
//! # Design Decisions
//! - Every proxy failure is a fixed 500 with a generic body
//! - Errors are logged where they happen; this module only shapes the reply

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::http::forwarder::ForwardError;
use crate::routing::RoutingError;

/// Body of every proxy error response.
pub const PROXY_ERROR_BODY: &str = "Reverse Proxy Error.";

/// The fixed reply for a failed proxy attempt.
pub fn proxy_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, PROXY_ERROR_BODY).into_response()
}

/// Reply for requests that are neither proxied nor passed to a fallback.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        proxy_error()
    }
}

impl IntoResponse for RoutingError {
    fn into_response(self) -> Response {
        proxy_error()
    }
}
