//! Proxy engine subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request under <prefix><remote-url>
//!     → ScopeEngine::load_config (must run before routing)
//!     → ScopeEngine::route (claims requests under the prefix)
//!     → ScopeEngine::fetch
//!         → request hooks (interception pipeline)
//!         → transport, only if no hook answered
//! ```
//!
//! # Design Decisions
//! - Hooks are registered once at startup, before the engine is shared
//! - Hooks run in registration order; the first response set wins
//! - The remote URL is the raw path tail after the prefix plus the query

pub mod scope;

pub use scope::{EngineConfig, EngineResponse, ScopeEngine, DEFAULT_PREFIX};

use crate::intercept::RequestEvent;

/// A callback invoked for every outbound request before it reaches the network.
pub trait RequestHook: Send + Sync {
    fn on_request(&self, event: &RequestEvent);
}

impl<F> RequestHook for F
where
    F: Fn(&RequestEvent) + Send + Sync,
{
    fn on_request(&self, event: &RequestEvent) {
        self(event)
    }
}
