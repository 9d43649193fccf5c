//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → settings.rs (RoutingSettings, built once at startup)
//!     → shared via Arc with the router
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    FallbackConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, RoutingConfig,
    UpstreamConfig,
};
pub use settings::{RoutingSettings, SettingsError};
