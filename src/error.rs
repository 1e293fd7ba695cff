//! Error types for the scope proxy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::loader::ConfigError;

/// Main error type for proxy operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid proxied target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metrics error: {0}")]
    Metrics(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::InvalidTarget { .. } | Error::Url(_) => {
                tracing::debug!(error = %self, "Rejecting proxied request");
                (StatusCode::BAD_REQUEST, "Invalid proxied URL").into_response()
            }
            Error::Body(_) => (StatusCode::PAYLOAD_TOO_LARGE, "Request body rejected").into_response(),
            Error::Transport(e) if e.is_timeout() => {
                tracing::warn!(error = %self, "Upstream timed out");
                (StatusCode::GATEWAY_TIMEOUT, "Upstream request timed out").into_response()
            }
            Error::Transport(_) => {
                tracing::error!(error = %self, "Upstream error");
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
            _ => {
                tracing::error!(error = %self, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;
