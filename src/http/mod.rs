//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, method allow-set, request span)
//!     → request.rs (buffer body, resolve host)
//!     → pipeline (translate, hooks, fetch, emit)
//!     → cookie.rs / date.rs (Set-Cookie re-encoding during emission)
//!     → Send to client
//! ```

pub mod cookie;
pub mod date;
pub mod middleware;
pub mod request;
pub mod server;

pub use server::{HttpServer, ServerError};
