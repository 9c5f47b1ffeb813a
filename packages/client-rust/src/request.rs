//! Request and response types shared by the invoker and the transport.

use std::collections::HashMap;
use std::time::Duration;

use appcall_core::Document;
use bytes::Bytes;
use http::Method;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RequestDescriptor
// ---------------------------------------------------------------------------

/// A request to perform against the application, before auth and encoding.
///
/// `path` is relative to the client's base URL. The body is kept as a
/// structured document; the authenticated client encodes it with its codec.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<Document>,
    pub timeout: Duration,
    /// Extra headers, keyed by lowercase name. The authenticated client
    /// lowercases any other keys it finds, then its auth, content-type and
    /// request-id headers replace entries with the same name.
    pub headers: HashMap<String, String>,
}

impl RequestDescriptor {
    /// A POST of `body` to `path`.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Document, timeout: Duration) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
            timeout,
            headers: HashMap::new(),
        }
    }

    /// Add a header; `name` is stored lowercase.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A raw HTTP response. Header names are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
}

impl Response {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The body bytes, or an empty slice when there is no body.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// HttpRequest
// ---------------------------------------------------------------------------

/// A fully resolved request handed to the transport pipeline.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Sent as `X-Request-Id` and recorded on the request span.
    pub request_id: Uuid,
    pub method: Method,
    /// Absolute URL (base URL + path).
    pub url: String,
    /// The path component, kept separately for logging and metrics.
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    pub timeout: Duration,
}
