//! Inbound translation: wire request → [`CanonicalRequest`].
//!
//! # Responsibilities
//! - Resolve absolute-form and origin-form request targets to one URL
//! - Split the URL into scheme, host, port, path, query and fragment
//! - Apply request defaults (no auth override, no redirects, cert checks on)
//! - Drop bodies on methods that cannot carry one upstream

use axum::body::Bytes;
use axum::http::Method;
use url::Url;

use crate::canonical::{CanonicalRequest, Headers, Protocol, DEFAULT_PORT};

/// Host assumed when an origin-form request carries no `Host` header.
pub const FALLBACK_HOST: &str = "127.0.0.1";

/// A request as delivered by the inbound transport.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Request target: either absolute (`http://host/path`) or path-only.
    pub uri: String,
    /// Protocol the request arrived over.
    pub protocol: Protocol,
    /// Declared host, usually the `Host` header.
    pub host: String,
    pub headers: Headers,
    pub body: Bytes,
}

/// Errors turning a request target into a URL. Fatal for that request.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("malformed request url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported url scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("request url '{0}' has no host")]
    MissingHost(String),
}

/// Result of inbound translation.
#[derive(Debug, Clone)]
pub struct Translated {
    pub request: CanonicalRequest,
    /// The parsed inbound URL; its credentials are the outbound fallback.
    pub origin: Url,
}

/// Translate a wire request into its canonical form.
pub fn translate(inbound: InboundRequest) -> Result<Translated, TranslateError> {
    let url = absolute_url(&inbound);
    let origin = Url::parse(&url).map_err(|source| TranslateError::InvalidUrl {
        url: url.clone(),
        source,
    })?;

    let protocol = Protocol::from_scheme(origin.scheme())
        .ok_or_else(|| TranslateError::UnsupportedScheme(origin.scheme().to_string()))?;
    let host = origin
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| TranslateError::MissingHost(url.clone()))?
        .to_string();

    let mut request = CanonicalRequest::new(inbound.method, protocol, host);
    request.port = origin.port().unwrap_or(DEFAULT_PORT);
    request.path = origin.path().to_string();
    request.query = origin.query().unwrap_or_default().to_string();
    request.fragment = origin.fragment().unwrap_or_default().to_string();
    request.headers = inbound.headers;
    request.body = Some(inbound.body);
    request.enforce_body_rule();

    Ok(Translated { request, origin })
}

/// The request target as an absolute URL.
///
/// Origin-form targets are prefixed with the declared protocol and host.
pub fn absolute_url(inbound: &InboundRequest) -> String {
    if has_scheme(&inbound.uri) {
        return inbound.uri.clone();
    }
    let host = if inbound.host.is_empty() {
        FALLBACK_HOST
    } else {
        inbound.host.as_str()
    };
    let separator = if inbound.uri.starts_with('/') { "" } else { "/" };
    format!("{}://{}{}{}", inbound.protocol, host, separator, inbound.uri)
}

fn has_scheme(uri: &str) -> bool {
    let Some((scheme, _)) = uri.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
