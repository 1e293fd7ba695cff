//! Scope proxy library.
//!
//! Serves a proxied web session under a registration scope and decides, for
//! every outbound request, whether to block it, answer it from memory, or
//! let it reach the network.
//!
//! # Architecture
//!
//! - [`config`]: Configuration loading and validation
//! - [`blocklist`]: Glob pattern compilation and host/path blocking
//! - [`playground`]: Origin-scoped virtual route table
//! - [`intercept`]: Request events and the classification pipeline
//! - [`engine`]: Scope-prefixed proxy engine with request hooks
//! - [`transport`]: Upstream fetching
//! - [`http`]: Axum server, dispatch, and response post-processing
//! - [`observability`]: Logging and metrics
//! - [`lifecycle`]: Shutdown coordination
//!
//! ```rust
//! use scope_proxy::blocklist::Blocklist;
//!
//! let blocklist = Blocklist::new([".doubleclick.net", "youtube.com/api/stats/ads/*"]);
//! assert!(blocklist.is_blocked("ads.doubleclick.net", "/pixel"));
//! assert!(!blocklist.is_blocked("youtube.com", "/watch"));
//! ```

pub mod blocklist;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod intercept;
pub mod lifecycle;
pub mod observability;
pub mod playground;
pub mod transport;

pub use config::ProxyConfig;
pub use error::{Error, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
