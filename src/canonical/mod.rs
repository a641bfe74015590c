//! Canonical request/response model.
//!
//! # Data Flow
//! ```text
//! wire request
//!     → pipeline::inbound (CanonicalRequest)
//!     → request hook (CanonicalRequest | CanonicalResponse)
//!     → pipeline::translate (CanonicalResponse from upstream)
//!     → response / error hook
//!     → pipeline::emitter (wire response)
//! ```
//!
//! # Design Decisions
//! - Plain records with public, typed fields; hooks replace them by value
//! - Headers are an ordered case-insensitive multimap
//! - `context` is owned by one request/response pair and never shared

pub mod headers;
pub mod request;
pub mod response;

pub use headers::Headers;
pub use request::{CanonicalRequest, Protocol, DEFAULT_PORT};
pub use response::{CanonicalResponse, PassHeaders, UNREACHABLE_STATUS};

/// Opaque per-request data threaded from a request to its paired response.
pub type Context = serde_json::Map<String, serde_json::Value>;
