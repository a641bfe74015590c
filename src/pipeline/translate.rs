//! Outbound translation: upstream wire response → [`CanonicalResponse`].
//!
//! The fetch transport hands over decoded bodies. When upstream declared gzip,
//! `Content-Encoding` and `Transfer-Encoding` are dropped so the client does
//! not try to decode a second time.

use super::dispatch::WireResponse;
use crate::canonical::{CanonicalResponse, Context, PassHeaders};

/// Build the canonical response for `response`, paired with `context`.
pub fn translate(response: WireResponse, context: Context) -> CanonicalResponse {
    let WireResponse {
        status,
        mut headers,
        body,
    } = response;

    let gzipped = headers
        .get_all("Content-Encoding")
        .any(|v| v.to_ascii_lowercase().contains("gzip"));
    if gzipped {
        headers.remove("Content-Encoding");
        headers.remove("Transfer-Encoding");
    }

    CanonicalResponse {
        code: status,
        headers,
        pass_headers: PassHeaders::All,
        body,
        context,
    }
}
