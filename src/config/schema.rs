//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::blocklist::DEFAULT_PATTERNS;

/// Root configuration for the scope proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Registration scope the proxy serves under.
    pub scope: ScopeConfig,

    /// Host/path patterns to block.
    pub blocklist: BlocklistConfig,

    /// Outer dispatch settings.
    pub dispatch: DispatchConfig,

    /// Origin for requests the engine does not claim.
    pub site: SiteConfig,

    /// Control channel for playground updates.
    pub control: ControlConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Maximum buffered request body for proxied requests, in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Registration scope.
///
/// The engine prefix is always derived from this as `<scope path>go/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Absolute scope URL, ending in `/`.
    pub url: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/ixlmath/".to_string(),
        }
    }
}

/// Blocklist configuration. Loaded once, never reloaded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlocklistConfig {
    pub patterns: Vec<String>,
}

impl Default for BlocklistConfig {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Outer dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Substrings of request URLs that bypass the engine entirely.
    pub exclusions: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            exclusions: vec!["supabase.co".to_string()],
        }
    }
}

/// Site serving non-proxied requests.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Upstream origin for origin-form requests outside the engine prefix.
    /// When unset, such requests get 404.
    pub upstream: Option<String>,
}

/// Control channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Enable the control endpoint.
    pub enabled: bool,

    /// Path the control endpoint is mounted on.
    pub path: String,

    /// Maximum control message size in bytes.
    pub max_body_size: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/__scope/message".to_string(),
            max_body_size: 4 * 1024 * 1024,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
