//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs parse
//! - Validate value ranges (timeouts > 0)
//! - Keep the control endpoint out of the engine prefix
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Blocklist patterns are trusted and never validated

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address is not a socket address: {0:?}")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address is not a socket address: {0:?}")]
    InvalidMetricsAddress(String),

    #[error("scope.url is not an absolute http(s) URL: {0:?}")]
    InvalidScopeUrl(String),

    #[error("scope.url must end with '/': {0:?}")]
    ScopeWithoutTrailingSlash(String),

    #[error("site.upstream is not an absolute http(s) URL: {0:?}")]
    InvalidSiteUpstream(String),

    #[error("control.path must start with '/' and contain no '{{', '}}' or '*': {0:?}")]
    InvalidControlPath(String),

    #[error("control.path {path:?} is inside the engine prefix {prefix:?}")]
    ControlPathInsidePrefix { path: String, prefix: String },

    #[error("{0} must be greater than 0")]
    Zero(&'static str),
}

/// Engine prefix derived from a scope URL: the scope path joined with `./go/`.
pub fn expected_prefix(scope: &Url) -> Result<String, url::ParseError> {
    Ok(scope.join("./go/")?.path().to_string())
}

fn parse_http_url(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let prefix = match parse_http_url(&config.scope.url) {
        Some(scope) if !scope.path().ends_with('/') => {
            errors.push(ValidationError::ScopeWithoutTrailingSlash(config.scope.url.clone()));
            None
        }
        Some(scope) => expected_prefix(&scope).ok(),
        None => {
            errors.push(ValidationError::InvalidScopeUrl(config.scope.url.clone()));
            None
        }
    };

    if let Some(upstream) = &config.site.upstream {
        if parse_http_url(upstream).is_none() {
            errors.push(ValidationError::InvalidSiteUpstream(upstream.clone()));
        }
    }

    if config.control.enabled {
        let path = &config.control.path;
        if !path.starts_with('/') || path.contains(['{', '}', '*']) {
            errors.push(ValidationError::InvalidControlPath(path.clone()));
        } else if let Some(prefix) = prefix.filter(|prefix| path.starts_with(prefix.as_str())) {
            errors.push(ValidationError::ControlPathInsidePrefix {
                path: path.clone(),
                prefix,
            });
        }
        if config.control.max_body_size == 0 {
            errors.push(ValidationError::Zero("control.max_body_size"));
        }
    }

    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::Zero("listener.max_body_size"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
