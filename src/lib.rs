//! Programmable forward HTTP proxy library.
//!
//! Requests are translated into canonical objects, passed through embedder
//! hooks, fetched upstream and emitted back to the client.

// Data model and request/response pipeline
pub mod canonical;
pub mod pipeline;
pub mod upstream;

// Transport edge
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use canonical::{CanonicalRequest, CanonicalResponse, Context, Headers, PassHeaders, Protocol};
pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{HookError, Hooks, Pipeline, RequestAction};
