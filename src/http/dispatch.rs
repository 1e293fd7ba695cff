//! Outer request dispatch.
//!
//! # Responsibilities
//! - Reconstruct the full URL of an incoming request
//! - Apply the exclusion list before the engine sees anything
//! - Resolve where a request goes when the engine does not claim it

use axum::http::{header, uri::PathAndQuery, Request, Uri};
use url::Url;

/// Runtime exclusion list.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    exclusions: Vec<String>,
}

impl Dispatcher {
    /// Build a dispatcher from URL substrings. Empty entries never match.
    pub fn new(exclusions: Vec<String>) -> Self {
        Self { exclusions }
    }

    /// Whether `url` bypasses the engine. Matches on substrings of the full URL.
    pub fn is_excluded(&self, url: &str) -> bool {
        self.exclusions
            .iter()
            .any(|needle| !needle.is_empty() && url.contains(needle.as_str()))
    }
}

/// Full URL of an incoming request.
///
/// Absolute-form URIs are used as-is; otherwise the Host header supplies
/// the authority.
pub fn request_url<B>(request: &Request<B>) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{}{}", host, path_and_query(uri))
}

/// Target for a request the engine does not handle.
///
/// Absolute-form URIs go straight to their own URL. Origin-form URIs are
/// resolved against the site upstream, if there is one.
pub fn direct_target(uri: &Uri, site: Option<&Url>) -> Option<Url> {
    if uri.scheme().is_some() {
        return Url::parse(&uri.to_string()).ok();
    }
    site?.join(path_and_query(uri)).ok()
}

fn path_and_query(uri: &Uri) -> &str {
    uri.path_and_query().map(PathAndQuery::as_str).unwrap_or("/")
}
