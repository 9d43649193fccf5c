//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → request.rs (routing view: host, url, referer)
//!     → [routing layer decides: passthrough or backend port]
//!     → forwarder.rs (upstream call with deadlines)
//!         → websocket.rs (tunnel for upgraded connections)
//!     → response.rs (errors become a generic 500)
//!     → Send to client
//! ```

pub mod forwarder;
pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use forwarder::{ForwardError, Forwarder};
pub use request::{RequestView, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
