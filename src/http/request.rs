//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract routing-relevant information (host, url, referer)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The routing view borrows from the request; nothing is copied until forwarding

use axum::http::{header, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of a request, or "unknown".
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// The parts of a request that routing looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestView<'a> {
    /// Host header, or the URI authority for HTTP/2.
    pub host: Option<&'a str>,
    /// Path and query.
    pub url: &'a str,
    /// Path only.
    pub path: &'a str,
    pub referer: Option<&'a str>,
}

impl<'a> RequestView<'a> {
    pub fn new(host: Option<&'a str>, url: &'a str, referer: Option<&'a str>) -> Self {
        let path = url.split('?').next().unwrap_or(url);
        Self {
            host,
            url,
            path,
            referer,
        }
    }

    /// Borrow the routing view of an HTTP request.
    pub fn from_request<B>(request: &'a Request<B>) -> Self {
        let headers = request.headers();
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| request.uri().authority().map(|a| a.as_str()));
        let referer = headers.get(header::REFERER).and_then(|v| v.to_str().ok());
        let url = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        Self::new(host, url, referer)
    }
}
