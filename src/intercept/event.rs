//! Request events and the responses hooks can attach to them.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use url::Url;

use crate::playground::VirtualFile;

/// Body sent when a request hits the blocklist.
pub const BLOCKED_BODY: &str = "Site Blocked";

/// Content type of the blocked body.
pub const BLOCKED_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// One outbound request as seen by the engine's request hooks.
///
/// The response slot starts empty and accepts a single value. Once set it
/// is final for the lifetime of the event.
#[derive(Debug)]
pub struct RequestEvent {
    url: Url,
    response: OnceCell<InterceptedResponse>,
}

impl RequestEvent {
    /// Create an event for `url` with an empty response slot.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            response: OnceCell::new(),
        }
    }

    /// Target URL of the outbound request.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fill the response slot. Returns false if it was already filled.
    pub fn respond_with(&self, response: InterceptedResponse) -> bool {
        self.response.set(response).is_ok()
    }

    /// The response set by a hook, if any.
    pub fn response(&self) -> Option<&InterceptedResponse> {
        self.response.get()
    }

    /// Whether a hook has already answered.
    pub fn is_handled(&self) -> bool {
        self.response.get().is_some()
    }

    /// Consume the event, yielding the response if a hook set one.
    pub fn into_response(self) -> Option<InterceptedResponse> {
        self.response.into_inner()
    }
}

/// Snapshot of a synthetic response in the shape the transport would have
/// produced, for consumers that introspect upstream responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub body: Bytes,
    pub headers: HeaderMap,
    pub status: StatusCode,
    pub status_text: String,
}

/// A response produced without touching the network.
#[derive(Debug, Clone)]
pub struct InterceptedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Plain header mapping, set on synthetic responses.
    pub raw_headers: Option<BTreeMap<String, String>>,
    pub raw_response: Option<RawResponse>,
    /// Resolved URL the response stands in for.
    pub final_url: Option<String>,
}

impl InterceptedResponse {
    fn bare(status: StatusCode, body: Bytes) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
            raw_headers: None,
            raw_response: None,
            final_url: None,
        }
    }

    /// 403 with the fixed blocked body, as plain text.
    pub fn blocked() -> Self {
        let mut response =
            Self::bare(StatusCode::FORBIDDEN, Bytes::from_static(BLOCKED_BODY.as_bytes()));
        response.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(BLOCKED_CONTENT_TYPE),
        );
        response
    }

    /// 200 with no body and no headers.
    pub fn empty() -> Self {
        Self::bare(StatusCode::OK, Bytes::new())
    }

    /// Serve a virtual file as if it had been fetched from `url`.
    pub fn synthetic(file: &VirtualFile, url: &Url) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(file.content_type));

        let raw_headers = BTreeMap::from([(
            header::CONTENT_TYPE.as_str().to_string(),
            file.content_type.to_string(),
        )]);
        let status = StatusCode::OK;
        let raw_response = RawResponse {
            body: file.content.clone(),
            headers: headers.clone(),
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        };

        Self {
            status,
            headers,
            body: file.content.clone(),
            raw_headers: Some(raw_headers),
            raw_response: Some(raw_response),
            final_url: Some(url.to_string()),
        }
    }
}

impl IntoResponse for InterceptedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_slot_starts_empty() {
        let event = RequestEvent::new(url("https://example.com/"));

        assert!(!event.is_handled());
        assert!(event.response().is_none());
        assert!(event.into_response().is_none());
    }

    #[test]
    fn test_slot_is_set_at_most_once() {
        let event = RequestEvent::new(url("https://example.com/"));

        assert!(event.respond_with(InterceptedResponse::blocked()));
        assert!(!event.respond_with(InterceptedResponse::empty()));

        let response = event.into_response().unwrap();
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.body, Bytes::from_static(b"Site Blocked"));
    }

    #[test]
    fn test_blocked_response_is_plain_text() {
        let response = InterceptedResponse::blocked();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.headers[header::CONTENT_TYPE], "text/plain;charset=UTF-8");
        assert_eq!(response.headers.len(), 1);
        assert!(response.raw_response.is_none());
    }

    #[test]
    fn test_empty_response_has_no_headers() {
        let response = InterceptedResponse::empty();

        assert_eq!(response.status, StatusCode::OK);
        assert!(response.headers.is_empty());
        assert!(response.body.is_empty());
        assert!(response.raw_response.is_none());
    }

    #[test]
    fn test_synthetic_response_carries_side_channel() {
        let file = VirtualFile {
            content: Bytes::from_static(b"<h1>Hi</h1>"),
            content_type: "text/html",
        };
        let target = url("https://play.example/");
        let response = InterceptedResponse::synthetic(&file, &target);

        assert_eq!(response.headers[header::CONTENT_TYPE], "text/html");
        assert_eq!(
            response.raw_headers.as_ref().unwrap().get("content-type").map(String::as_str),
            Some("text/html")
        );
        let raw = response.raw_response.as_ref().unwrap();
        assert_eq!(raw.status, StatusCode::OK);
        assert_eq!(raw.status_text, "OK");
        assert_eq!(raw.body, response.body);
        assert_eq!(response.final_url.as_deref(), Some("https://play.example/"));
    }

    #[tokio::test]
    async fn test_into_response_adds_no_headers() {
        let response = InterceptedResponse::empty().into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().is_empty());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }
}
