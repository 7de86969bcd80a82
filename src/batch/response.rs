//! Buffered responses detached from their transport connection.
//!
//! # Responsibilities
//! - Hold the status, headers and a fully materialized body
//! - Echo the originating request without its cancellation token
//! - Give callers a re-readable view over the body bytes

use bytes::{Buf, Bytes};
use http::{HeaderMap, Method, StatusCode, Uri, Version};
use http_body_util::Full;
use hyper::ext::ReasonPhrase;

/// The parts of a request worth keeping once it has been sent.
///
/// Extensions are left behind on purpose, so the batch deadline token never
/// outlives the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl RequestHead {
    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            version: request.version(),
            headers: request.headers().clone(),
        }
    }
}

/// A response whose body was read in full before the batch finished.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: StatusCode,
    status_line: String,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    request: RequestHead,
    closed: bool,
}

impl BufferedResponse {
    /// Assemble from the transport response head and the bytes read off its body.
    pub(crate) fn from_parts(parts: http::response::Parts, body: Bytes, request: RequestHead) -> Self {
        let status_line = status_line(parts.status, parts.extensions.get::<ReasonPhrase>());
        Self {
            status: parts.status,
            status_line,
            version: parts.version,
            headers: parts.headers,
            body,
            request,
            closed: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Status code and reason, e.g. `200 OK`.
    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request this response answers.
    pub fn request(&self) -> &RequestHead {
        &self.request
    }

    /// Buffered body. Empty after [`close`](Self::close).
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// A fresh reader over the body; every call starts at the first byte.
    pub fn reader(&self) -> impl std::io::Read {
        self.body.clone().reader()
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Rebuild an `http::Response` over a copy of the buffered body.
    pub fn to_http(&self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(self.body.clone()));
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers.clone();
        response
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Release the buffered body. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.body = Bytes::new();
        self.closed = true;
    }
}

fn status_line(status: StatusCode, reason: Option<&ReasonPhrase>) -> String {
    let reason = match reason {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => status.canonical_reason().unwrap_or_default().to_string(),
    };
    if reason.is_empty() {
        status.as_str().to_string()
    } else {
        format!("{} {}", status.as_str(), reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::io::Read;

    fn sample() -> BufferedResponse {
        let (parts, ()) = http::Response::builder()
            .status(StatusCode::CREATED)
            .header("x-trace", "abc")
            .body(())
            .unwrap()
            .into_parts();
        let request = http::Request::post("http://api.local/items")
            .header("accept", "application/json")
            .body(())
            .unwrap();
        BufferedResponse::from_parts(parts, Bytes::from_static(b"payload"), RequestHead::from_request(&request))
    }

    #[test]
    fn status_line_uses_canonical_reason() {
        let response = sample();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.status_line(), "201 Created");
    }

    #[test]
    fn status_line_keeps_custom_reason() {
        let mut response = http::Response::new(());
        response.extensions_mut().insert(ReasonPhrase::from_static(b"Fine"));
        let (parts, ()) = response.into_parts();
        let request = http::Request::get("http://host/").body(()).unwrap();

        let buffered = BufferedResponse::from_parts(parts, Bytes::new(), RequestHead::from_request(&request));
        assert_eq!(buffered.status_line(), "200 Fine");
    }

    #[test]
    fn status_line_for_unknown_code_has_no_reason() {
        assert_eq!(status_line(StatusCode::from_u16(599).unwrap(), None), "599");
    }

    #[test]
    fn body_can_be_read_repeatedly() {
        let response = sample();
        for _ in 0..2 {
            let mut out = String::new();
            response.reader().read_to_string(&mut out).unwrap();
            assert_eq!(out, "payload");
        }
        assert_eq!(response.text(), "payload");
    }

    #[test]
    fn request_echo_keeps_head() {
        let response = sample();
        assert_eq!(response.request().method, Method::POST);
        assert_eq!(response.request().uri, "http://api.local/items");
        assert_eq!(response.request().headers["accept"], "application/json");
    }

    #[tokio::test]
    async fn to_http_copies_head_and_body() {
        let response = sample().to_http();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-trace"], "abc");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"payload"));
    }

    #[test]
    fn close_is_idempotent() {
        let mut response = sample();
        response.close();
        response.close();
        assert!(response.is_closed());
        assert!(response.body().is_empty());
    }
}
