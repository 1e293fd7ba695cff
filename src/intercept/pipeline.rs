//! Request classification.
//!
//! Each event lands in exactly one outcome, checked in this order:
//! 1. Block: host/path matches the blocklist
//! 2. Synthetic: playground origin claims the URL and the path is mapped
//! 3. Scoped empty: playground origin claims the URL, path unmapped
//! 4. Pass-through: none of the above, the slot is left untouched

use std::sync::Arc;

use url::Url;

use crate::blocklist::Blocklist;
use crate::engine::RequestHook;
use crate::intercept::event::{InterceptedResponse, RequestEvent};
use crate::observability::metrics;
use crate::playground::{PlaygroundStore, VirtualFile};

/// Outcome of classifying one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Block,
    Synthetic(VirtualFile),
    ScopedEmpty,
    PassThrough,
}

impl Decision {
    /// Stable label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::Block => "blocked",
            Decision::Synthetic(_) => "synthetic",
            Decision::ScopedEmpty => "scoped_empty",
            Decision::PassThrough => "pass_through",
        }
    }

    /// Response for this decision, or None to let the transport handle it.
    pub fn into_response(self, url: &Url) -> Option<InterceptedResponse> {
        match self {
            Decision::Block => Some(InterceptedResponse::blocked()),
            Decision::Synthetic(file) => Some(InterceptedResponse::synthetic(&file, url)),
            Decision::ScopedEmpty => Some(InterceptedResponse::empty()),
            Decision::PassThrough => None,
        }
    }
}

/// The request hook that applies the blocklist and playground routes.
#[derive(Debug, Clone)]
pub struct Interceptor {
    blocklist: Arc<Blocklist>,
    playground: Arc<PlaygroundStore>,
}

impl Interceptor {
    /// Create an interceptor over a fixed blocklist and a live playground store.
    pub fn new(blocklist: Arc<Blocklist>, playground: Arc<PlaygroundStore>) -> Self {
        Self {
            blocklist,
            playground,
        }
    }

    /// Classify a target URL. Pure with respect to the current playground snapshot.
    pub fn classify(&self, url: &Url) -> Decision {
        let hostname = url.host_str().unwrap_or_default();
        if self.blocklist.is_blocked(hostname, url.path()) {
            return Decision::Block;
        }

        match self.playground.current() {
            Some(playground) if playground.claims(url) => match playground.lookup(url.path()) {
                Some(file) => Decision::Synthetic(file.clone()),
                None => Decision::ScopedEmpty,
            },
            _ => Decision::PassThrough,
        }
    }

    /// Classify the event and fill its response slot accordingly.
    pub fn intercept(&self, event: &RequestEvent) -> &'static str {
        let decision = self.classify(event.url());
        let outcome = decision.outcome();

        tracing::debug!(
            outcome,
            host = event.url().host_str().unwrap_or_default(),
            path = event.url().path(),
            "Request classified"
        );
        metrics::record_decision(outcome);

        if let Some(response) = decision.into_response(event.url()) {
            event.respond_with(response);
        }
        outcome
    }
}

impl RequestHook for Interceptor {
    fn on_request(&self, event: &RequestEvent) {
        self.intercept(event);
    }
}
