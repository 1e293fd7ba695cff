//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared with subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup; the blocklist is never reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    BlocklistConfig, ControlConfig, DispatchConfig, ListenerConfig, ObservabilityConfig,
    ProxyConfig, ScopeConfig, SiteConfig, TimeoutConfig,
};
pub use validation::{expected_prefix, validate_config, ValidationError};
