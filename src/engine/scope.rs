//! Scope-prefixed proxy engine.
//!
//! # Responsibilities
//! - Hold the mutable engine config (the URL prefix it claims)
//! - Decide whether a request belongs to the engine
//! - Decode the remote URL from the request path
//! - Run request hooks, then fall back to the transport

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::body::Body;
use axum::http::{Request, Uri};
use url::Url;

use crate::engine::RequestHook;
use crate::error::{Error, Result};
use crate::intercept::{InterceptedResponse, RequestEvent};
use crate::transport::{FetchedResponse, Transport, UpstreamRequest};

/// Prefix the engine claims until told otherwise.
pub const DEFAULT_PREFIX: &str = "/service/";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Path prefix in front of every proxied URL, with leading and trailing `/`.
    pub prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Result of an engine fetch.
#[derive(Debug)]
pub enum EngineResponse {
    /// A hook answered the request; the network was not touched.
    Intercepted(InterceptedResponse),
    /// The transport fetched the remote URL.
    Fetched(FetchedResponse),
}

/// The engine that serves `<prefix><remote-url>` requests.
pub struct ScopeEngine {
    /// None until `load_config` has run.
    config: ArcSwapOption<EngineConfig>,
    initial: EngineConfig,
    hooks: Vec<Arc<dyn RequestHook>>,
    transport: Transport,
    max_body_size: usize,
}

impl ScopeEngine {
    /// Create an engine that installs `initial` on first config load.
    pub fn new(initial: EngineConfig, transport: Transport, max_body_size: usize) -> Self {
        Self {
            config: ArcSwapOption::empty(),
            initial,
            hooks: Vec::new(),
            transport,
            max_body_size,
        }
    }

    /// Register a hook that sees every request before the transport does.
    pub fn add_request_hook(&mut self, hook: Arc<dyn RequestHook>) {
        self.hooks.push(hook);
    }

    /// Number of registered request hooks.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Load the engine config if it is not loaded yet, and return it.
    pub fn load_config(&self) -> Arc<EngineConfig> {
        if let Some(config) = self.config.load_full() {
            return config;
        }
        let initial = Arc::new(self.initial.clone());
        self.config
            .rcu(|current| current.clone().or_else(|| Some(initial.clone())));
        self.config.load_full().unwrap_or(initial)
    }

    /// Whether `load_config` has run.
    pub fn is_loaded(&self) -> bool {
        self.config.load().is_some()
    }

    /// Current prefix, if the config has been loaded.
    pub fn prefix(&self) -> Option<String> {
        self.config.load_full().map(|config| config.prefix.clone())
    }

    /// Replace the engine config with one claiming `prefix`.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.config.store(Some(Arc::new(EngineConfig {
            prefix: prefix.into(),
        })));
    }

    /// Force the prefix to `expected`. Returns true when it had to be corrected.
    pub fn ensure_prefix(&self, expected: &str) -> bool {
        let current = self.load_config();
        if current.prefix == expected {
            return false;
        }
        tracing::debug!(from = %current.prefix, to = %expected, "Correcting engine prefix");
        self.set_prefix(expected);
        true
    }

    /// Whether the engine claims a request for `uri`.
    pub fn route(&self, uri: &Uri) -> bool {
        match &*self.config.load() {
            Some(config) => uri
                .path()
                .strip_prefix(config.prefix.as_str())
                .is_some_and(|tail| !tail.is_empty()),
            None => false,
        }
    }

    /// Decode the remote URL carried by `uri`.
    pub fn target_url(&self, uri: &Uri) -> Result<Url> {
        let config = self.load_config();
        let tail = uri
            .path()
            .strip_prefix(config.prefix.as_str())
            .unwrap_or_default();
        let raw = match uri.query() {
            Some(query) => format!("{tail}?{query}"),
            None => tail.to_string(),
        };

        let url = Url::parse(&raw).map_err(|e| Error::InvalidTarget {
            target: raw.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::InvalidTarget {
                target: raw,
                reason: format!("unsupported scheme {other:?}"),
            }),
        }
    }

    /// Serve a claimed request: hooks first, transport only if none answered.
    pub async fn fetch(&self, request: Request<Body>) -> Result<EngineResponse> {
        let event = RequestEvent::new(self.target_url(request.uri())?);
        for hook in &self.hooks {
            if event.is_handled() {
                break;
            }
            hook.on_request(&event);
        }

        let url = event.url().clone();
        if let Some(response) = event.into_response() {
            return Ok(EngineResponse::Intercepted(response));
        }

        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, self.max_body_size)
            .await
            .map_err(|e| Error::Body(e.to_string()))?;

        let fetched = self
            .transport
            .fetch(UpstreamRequest {
                method: parts.method,
                url,
                headers: parts.headers,
                body,
            })
            .await?;
        Ok(EngineResponse::Fetched(fetched))
    }
}

impl std::fmt::Debug for ScopeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeEngine")
            .field("config", &self.config.load_full())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
