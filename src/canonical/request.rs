//! Canonical form of one inbound request.

use std::fmt;

use axum::body::Bytes;
use axum::http::Method;

use super::{Context, Headers};

/// Port assumed when the request URL carries none.
pub const DEFAULT_PORT: u16 = 80;

/// URL scheme of a canonical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// Parse a URL scheme, case-insensitively.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        if scheme.eq_ignore_ascii_case("http") {
            Some(Protocol::Http)
        } else if scheme.eq_ignore_ascii_case("https") {
            Some(Protocol::Https)
        } else {
            None
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request about to be (possibly) forwarded upstream.
///
/// Request hooks receive this by value and hand back either a replacement
/// or a [`CanonicalResponse`](super::CanonicalResponse).
#[derive(Debug, Clone)]
pub struct CanonicalRequest {
    pub method: Method,
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: String,
    pub fragment: String,
    /// Upstream auth override; never filled from the inbound URL.
    pub username: Option<String>,
    /// Upstream auth override; never filled from the inbound URL.
    pub password: Option<String>,
    pub body: Option<Bytes>,
    pub headers: Headers,
    pub follow_redirects: bool,
    pub validate_cert: bool,
    pub context: Context,
}

impl CanonicalRequest {
    /// Build a request with every optional field at its default.
    pub fn new(method: Method, protocol: Protocol, host: impl Into<String>) -> Self {
        Self {
            method,
            protocol,
            host: host.into(),
            port: DEFAULT_PORT,
            path: String::new(),
            query: String::new(),
            fragment: String::new(),
            username: None,
            password: None,
            body: None,
            headers: Headers::new(),
            follow_redirects: false,
            validate_cert: true,
            context: Context::new(),
        }
    }

    /// Whether `method` may carry a request body upstream.
    pub fn is_body_method(method: &Method) -> bool {
        *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
    }

    /// Clear the body unless the method is body-bearing.
    pub fn enforce_body_rule(&mut self) {
        if self.body.is_some() && !Self::is_body_method(&self.method) {
            self.body = None;
        }
    }
}
