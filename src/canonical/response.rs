//! Canonical form of a response destined for the original client.

use axum::body::Bytes;

use super::{Context, Headers};

/// Reserved status meaning "upstream unreachable"; always emitted as 500.
pub const UNREACHABLE_STATUS: u16 = 599;

/// Which response headers are copied to the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PassHeaders {
    #[default]
    All,
    None,
    /// Exactly these names, matched case-insensitively.
    Only(Vec<String>),
}

impl From<bool> for PassHeaders {
    fn from(pass: bool) -> Self {
        if pass {
            PassHeaders::All
        } else {
            PassHeaders::None
        }
    }
}

impl<S: Into<String>> From<Vec<S>> for PassHeaders {
    fn from(names: Vec<S>) -> Self {
        PassHeaders::Only(names.into_iter().map(Into::into).collect())
    }
}

/// A response on its way back to the client.
#[derive(Debug, Clone)]
pub struct CanonicalResponse {
    pub code: u16,
    pub headers: Headers,
    pub pass_headers: PassHeaders,
    pub body: Bytes,
    pub context: Context,
}

impl Default for CanonicalResponse {
    fn default() -> Self {
        Self {
            code: 200,
            headers: Headers::new(),
            pass_headers: PassHeaders::All,
            body: Bytes::new(),
            context: Context::new(),
        }
    }
}

impl CanonicalResponse {
    /// Response with the given status and every other field defaulted.
    pub fn with_code(code: u16) -> Self {
        Self {
            code,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl AsRef<[u8]>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Whether this is the unreachable-upstream sentinel.
    pub fn is_unreachable(&self) -> bool {
        self.code == UNREACHABLE_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_everything() {
        let resp = CanonicalResponse::default();
        assert_eq!(resp.code, 200);
        assert_eq!(resp.pass_headers, PassHeaders::All);
        assert!(resp.body.is_empty());
        assert!(resp.headers.is_empty());
    }

    #[test]
    fn pass_headers_conversions() {
        assert_eq!(PassHeaders::from(false), PassHeaders::None);
        assert_eq!(
            PassHeaders::from(vec!["Content-Type"]),
            PassHeaders::Only(vec!["Content-Type".to_string()])
        );
    }

    #[test]
    fn builder_sets_fields() {
        let resp = CanonicalResponse::with_code(302)
            .header("Location", "/elsewhere")
            .body("moved");
        assert_eq!(resp.code, 302);
        assert_eq!(resp.headers.get("location"), Some("/elsewhere"));
        assert_eq!(&resp.body[..], b"moved");
        assert!(!resp.is_unreachable());
        assert!(CanonicalResponse::with_code(599).is_unreachable());
    }
}
