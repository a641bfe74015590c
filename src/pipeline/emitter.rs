//! Response emission: [`CanonicalResponse`] → wire response.
//!
//! # Order
//! 1. Status 599 short-circuits to the fixed unreachable page
//! 2. Status is applied
//! 3. Header names are selected by the pass-headers policy
//! 4. Plain headers are copied value by value
//! 5. `Set-Cookie` values are parsed and re-encoded one cookie each
//! 6. Body is attached
//!
//! Emission consumes the canonical response and yields exactly one wire
//! response. Framing headers (`Content-Length`, `Transfer-Encoding`,
//! `Connection`) are never copied; the server frames the body itself.

use std::fmt;

use axum::body::Body;
use axum::http::header::{HeaderName, HeaderValue, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;

use crate::canonical::{CanonicalResponse, PassHeaders};
use crate::http::cookie::SetCookie;

/// Body sent in place of any response carrying the unreachable sentinel.
pub const UNREACHABLE_BODY: &str = "Internal server error. Server unreachable.";

/// Path given to re-emitted cookies that did not declare one.
const DEFAULT_COOKIE_PATH: &str = "/";

const FRAMING_HEADERS: &[&str] = &["content-length", "transfer-encoding", "connection"];

/// Turn the final canonical response into the client response.
pub fn emit(response: CanonicalResponse) -> Response {
    if response.is_unreachable() {
        return plain(StatusCode::INTERNAL_SERVER_ERROR, UNREACHABLE_BODY.to_string());
    }

    let status = match StatusCode::from_u16(response.code) {
        Ok(status) => status,
        Err(_) => {
            tracing::warn!(code = response.code, "Hook produced an invalid status code");
            return emit_failure(format!("invalid status code {}", response.code));
        }
    };

    let headers = emit_headers(&response);

    let mut out = Response::new(if response.body.is_empty() {
        Body::empty()
    } else {
        Body::from(response.body)
    });
    *out.status_mut() = status;
    *out.headers_mut() = headers;
    out
}

/// Hard-failure page: 500 with a diagnostic body, no hooks involved.
pub fn emit_failure(error: impl fmt::Display) -> Response {
    plain(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Internal server error:\n{}", error),
    )
}

/// Header names to emit under the response's pass-headers policy.
pub fn selected_keys(response: &CanonicalResponse) -> Vec<String> {
    match &response.pass_headers {
        PassHeaders::All => response.headers.keys().into_iter().map(str::to_string).collect(),
        PassHeaders::None => Vec::new(),
        PassHeaders::Only(names) => {
            let mut keys: Vec<String> = Vec::new();
            for name in names {
                if !keys.iter().any(|k| k.eq_ignore_ascii_case(name)) {
                    keys.push(name.clone());
                }
            }
            keys
        }
    }
}

fn emit_headers(response: &CanonicalResponse) -> HeaderMap {
    let mut map = HeaderMap::new();

    for key in selected_keys(response) {
        if FRAMING_HEADERS.iter().any(|f| f.eq_ignore_ascii_case(&key)) {
            continue;
        }

        if key.eq_ignore_ascii_case(SET_COOKIE.as_str()) {
            for raw in response.headers.get_all_bytes(&key) {
                let Ok(text) = std::str::from_utf8(raw) else {
                    // Not UTF-8: forwarded untouched.
                    if let Ok(value) = HeaderValue::from_bytes(raw) {
                        map.append(SET_COOKIE, value);
                    }
                    continue;
                };
                let Some(mut cookie) = SetCookie::parse(text) else {
                    tracing::debug!(value = %text, "Dropping unparsable Set-Cookie");
                    continue;
                };
                if cookie.path.is_none() {
                    cookie.path = Some(DEFAULT_COOKIE_PATH.to_string());
                }
                match HeaderValue::from_str(&cookie.to_string()) {
                    Ok(value) => {
                        map.append(SET_COOKIE, value);
                    }
                    Err(_) => tracing::debug!(cookie = %cookie.name, "Dropping Set-Cookie with invalid bytes"),
                }
            }
            continue;
        }

        let Ok(name) = HeaderName::from_bytes(key.as_bytes()) else {
            tracing::debug!(header = %key, "Dropping invalid header name");
            continue;
        };
        for raw in response.headers.get_all_bytes(&key) {
            match HeaderValue::from_bytes(raw) {
                Ok(value) => {
                    map.append(name.clone(), value);
                }
                Err(_) => tracing::debug!(header = %key, "Dropping invalid header value"),
            }
        }
    }
    map
}

fn plain(status: StatusCode, body: String) -> Response {
    let mut out = Response::new(Body::from(body));
    *out.status_mut() = status;
    out.headers_mut().insert(
        axum::http::header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    out
}
