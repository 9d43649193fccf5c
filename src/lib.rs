//! Port-addressed reverse proxy library.
//!
//! Routes each request either to a backend on `localhost:<port>` (named by
//! the `Host` header or a `/_proxy/<port>` path segment) or through to the
//! application server.

pub mod config;
pub mod http;
pub mod routing;

pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::{ProxyConfig, RoutingSettings};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Router, RoutingDecision};
