//! Virtual route table for playground content.
//!
//! # Data Flow
//! ```text
//! control message {type: "playgroundData", origin, html, css, js}
//!     → PlaygroundStore::apply (build a fresh Playground)
//!     → atomic swap of Arc<Playground>
//!
//! Per request:
//!     PlaygroundStore::current → Playground::claims(url) → Playground::lookup(path)
//! ```
//!
//! # Design Decisions
//! - One writer (the control channel), many readers (request handlers)
//! - Updates replace the whole table, never merge into it
//! - Readers see the old table or the new one, never a mix
//! - Nothing is persisted across restarts

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::observability::metrics;

/// Messages accepted on the control channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    #[serde(rename = "playgroundData")]
    PlaygroundData(PlaygroundData),
    /// Any other message type. Ignored.
    #[serde(other)]
    Unknown,
}

/// Payload of a `playgroundData` control message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaygroundData {
    /// Origin the content is served under, e.g. `https://play.example/`.
    pub origin: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
}

/// A synthetic file served from memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    pub content: Bytes,
    pub content_type: &'static str,
}

impl VirtualFile {
    fn new(content: String, content_type: &'static str) -> Self {
        Self {
            content: Bytes::from(content),
            content_type,
        }
    }
}

/// An origin-scoped table of exact path → virtual file.
#[derive(Debug, Clone)]
pub struct Playground {
    origin: String,
    routes: HashMap<&'static str, VirtualFile>,
}

impl Playground {
    /// The origin this table is scoped to.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Whether requests to `url` belong to this playground.
    pub fn claims(&self, url: &Url) -> bool {
        url.as_str().starts_with(&self.origin)
    }

    /// Look up the file for an exact pathname.
    pub fn lookup(&self, pathname: &str) -> Option<&VirtualFile> {
        self.routes.get(pathname)
    }

    /// Number of paths served.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table serves no paths.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl From<PlaygroundData> for Playground {
    fn from(data: PlaygroundData) -> Self {
        let routes = HashMap::from([
            ("/", VirtualFile::new(data.html, "text/html")),
            ("/style.css", VirtualFile::new(data.css, "text/css")),
            ("/script.js", VirtualFile::new(data.js, "application/javascript")),
        ]);

        Self {
            origin: data.origin,
            routes,
        }
    }
}

/// Process-wide holder of the current playground.
///
/// Starts empty and may stay empty for the whole session.
#[derive(Debug, Default)]
pub struct PlaygroundStore {
    current: ArcSwapOption<Playground>,
}

impl PlaygroundStore {
    /// Create a store with no playground loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the active playground, if any.
    pub fn current(&self) -> Option<Arc<Playground>> {
        self.current.load_full()
    }

    /// Replace the active playground wholesale.
    pub fn replace(&self, playground: Playground) {
        tracing::info!(
            origin = %playground.origin,
            routes = playground.len(),
            "Playground content replaced"
        );
        self.current.store(Some(Arc::new(playground)));
        metrics::record_playground_update();
    }

    /// Apply a control message. Returns true when the table was replaced.
    ///
    /// A `playgroundData` message with an empty origin is dropped, since
    /// the empty string would claim every URL.
    pub fn apply(&self, message: ControlMessage) -> bool {
        match message {
            ControlMessage::PlaygroundData(data) if data.origin.is_empty() => {
                tracing::warn!("Ignoring playground data with an empty origin");
                false
            }
            ControlMessage::PlaygroundData(data) => {
                self.replace(Playground::from(data));
                true
            }
            ControlMessage::Unknown => {
                tracing::debug!("Ignoring unknown control message");
                false
            }
        }
    }
}
