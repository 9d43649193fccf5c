//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, referer)
//!     → router.rs (decide)
//!     → classifier.rs (eligible? which port source?)
//!         → port.rs (host form / path form)
//!     → rewrite.rs (strip marker, prefix base path, pick target URL)
//!     → Return: Passthrough or Proxy(ForwardTarget)
//!
//! Settings (at startup):
//!     RoutingConfig
//!     → RoutingSettings::init
//!     → Freeze in Arc, hand to Router
//! ```
//!
//! # Design Decisions
//! - Settings built once at startup, immutable at runtime
//! - No regex in hot path (small hand-written scanners)
//! - Deterministic: same input always yields the same decision
//! - Host addressing always beats path addressing

pub mod classifier;
pub mod port;
pub mod rewrite;
pub mod router;

pub use classifier::{is_reverse_proxy_request, PortSource};
pub use port::{BackendPort, PortMatch};
pub use rewrite::{compute_target, ForwardTarget, RoutingError};
pub use router::{Router, RoutingDecision};
