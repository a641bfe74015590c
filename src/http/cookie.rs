//! `Set-Cookie` parsing and re-encoding.
//!
//! Each header value is one cookie. Known attributes are kept; unknown or
//! malformed attributes are dropped, and an `Expires` that does not parse is
//! dropped rather than failing the cookie.

use std::fmt;

use chrono::{DateTime, Utc};

use super::date::{format_http_date, parse_http_date};

/// One cookie from a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
    pub max_age: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub comment: Option<String>,
    pub version: Option<String>,
    pub same_site: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl SetCookie {
    /// Parse a single `Set-Cookie` value.
    ///
    /// Returns `None` when the leading `name=value` pair is missing or the
    /// name is not a valid token.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() || !name.bytes().all(is_token_byte) {
            return None;
        }

        let mut cookie = SetCookie {
            name: name.to_string(),
            value: value.trim().to_string(),
            ..SetCookie::default()
        };

        for attr in parts {
            let (key, val) = match attr.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (attr.trim(), None),
            };
            if key.is_empty() {
                continue;
            }
            match (key.to_ascii_lowercase().as_str(), val) {
                ("expires", Some(v)) => {
                    cookie.expires = parse_http_date(v);
                    if cookie.expires.is_none() {
                        tracing::debug!(cookie = %cookie.name, expires = %v, "Dropping unparsable cookie expiry");
                    }
                }
                ("max-age", Some(v)) => cookie.max_age = Some(v.to_string()),
                ("domain", Some(v)) => cookie.domain = Some(v.to_string()),
                ("path", Some(v)) => cookie.path = Some(v.to_string()),
                ("comment", Some(v)) => cookie.comment = Some(v.to_string()),
                ("version", Some(v)) => cookie.version = Some(v.to_string()),
                ("samesite", Some(v)) => cookie.same_site = Some(v.to_string()),
                ("secure", _) => cookie.secure = true,
                ("httponly", _) => cookie.http_only = true,
                _ => {
                    tracing::debug!(cookie = %cookie.name, attribute = %key, "Dropping unknown cookie attribute");
                }
            }
        }
        Some(cookie)
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(expires) = &self.expires {
            write!(f, "; Expires={}", format_http_date(expires))?;
        }
        if let Some(max_age) = &self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={}", domain)?;
        }
        if let Some(path) = &self.path {
            write!(f, "; Path={}", path)?;
        }
        if let Some(comment) = &self.comment {
            write!(f, "; Comment={}", comment)?;
        }
        if let Some(version) = &self.version {
            write!(f, "; Version={}", version)?;
        }
        if let Some(same_site) = &self.same_site {
            write!(f, "; SameSite={}", same_site)?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        Ok(())
    }
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
