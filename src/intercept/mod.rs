//! Request interception subsystem.
//!
//! # Data Flow
//! ```text
//! ScopeEngine::fetch
//!     → RequestEvent { url, empty slot }
//!     → Interceptor (as a RequestHook)
//!         → Blocklist::is_blocked        → 403 "Site Blocked"
//!         → Playground::claims + lookup  → synthetic file / empty body
//!         → otherwise                    → slot untouched
//!     → slot set? return it : transport fetch
//! ```
//!
//! # Design Decisions
//! - Classification is synchronous and total; no error path
//! - Block always wins over playground content
//! - A claimed origin is always answered locally, never fetched

pub mod event;
pub mod pipeline;

pub use event::{
    InterceptedResponse, RawResponse, RequestEvent, BLOCKED_BODY, BLOCKED_CONTENT_TYPE,
};
pub use pipeline::{Decision, Interceptor};
