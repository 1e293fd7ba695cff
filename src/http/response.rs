//! Upstream response handling.
//!
//! # Responsibilities
//! - Turn a buffered upstream response into a client response
//! - Recompute `content-length` for HTML bodies after decoding
//!
//! # Design Decisions
//! - HTML is decoded lossily as UTF-8 and re-encoded, so the declared
//!   length always matches the bytes actually sent

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;

use crate::transport::FetchedResponse;

/// Whether the headers declare an HTML body.
pub fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/html"))
}

/// Pass an upstream response to the client unchanged.
pub fn from_fetched(fetched: FetchedResponse) -> Response {
    let mut response = Response::new(Body::from(fetched.body));
    *response.status_mut() = fetched.status;
    *response.headers_mut() = fetched.headers;
    response
}

/// Post-process a response fetched for a claimed request.
pub fn finalize(mut fetched: FetchedResponse) -> Response {
    if is_html(&fetched.headers) {
        let text = String::from_utf8_lossy(&fetched.body).into_owned();
        fetched
            .headers
            .insert(header::CONTENT_LENGTH, HeaderValue::from(text.len()));
        fetched.body = Bytes::from(text);
    }
    from_fetched(fetched)
}
