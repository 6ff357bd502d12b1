//! Borrowed snapshot of the request attributes a signature can cover.

use http::{HeaderMap, Method, Uri};

/// The parts of an HTTP request that signature components resolve against.
///
/// Built from either a full [`http::Request`] or its [`http::request::Parts`],
/// and passed explicitly into every signing and verification call.
#[derive(Debug, Clone, Copy)]
pub struct MessageView<'a> {
    /// Request method.
    pub method: &'a Method,
    /// Request URI as received (absolute or origin-form).
    pub uri: &'a Uri,
    /// Request headers.
    pub headers: &'a HeaderMap,
}

impl<'a> MessageView<'a> {
    /// Create a view from its parts.
    #[must_use]
    pub fn new(method: &'a Method, uri: &'a Uri, headers: &'a HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
        }
    }

    /// The authority the request was addressed to.
    ///
    /// Absolute request URIs carry it directly; otherwise the `Host` header
    /// recorded with the request is used.
    #[must_use]
    pub fn authority(&self) -> Option<&'a str> {
        if let Some(authority) = self.uri.authority() {
            return Some(authority.as_str());
        }
        self.headers
            .get(http::header::HOST)
            .and_then(|value| value.to_str().ok())
    }

    /// The request target exactly as it appeared on the request line.
    #[must_use]
    pub fn request_target(&self) -> &'a str {
        self.uri
            .path_and_query()
            .map_or_else(|| self.uri.path(), http::uri::PathAndQuery::as_str)
    }

    /// The raw, undecoded query string (empty when absent).
    #[must_use]
    pub fn raw_query(&self) -> &'a str {
        self.uri.query().unwrap_or("")
    }

    /// Whether the request URI carries both a scheme and an authority.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.uri.scheme().is_some() && self.uri.authority().is_some()
    }
}

impl<'a> From<&'a http::request::Parts> for MessageView<'a> {
    fn from(parts: &'a http::request::Parts) -> Self {
        Self::new(&parts.method, &parts.uri, &parts.headers)
    }
}

impl<'a, B> From<&'a http::Request<B>> for MessageView<'a> {
    fn from(request: &'a http::Request<B>) -> Self {
        Self::new(request.method(), request.uri(), request.headers())
    }
}
