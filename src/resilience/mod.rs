//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts.rs (enforce connect/response timeout)
//!     → On failure: single 500, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries: a backend port is either up or gone for this request,
//!   and retrying would hide backend crashes from the client

pub mod timeouts;

pub use timeouts::{with_deadline, Elapsed, UpstreamTimeouts};
