//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (optional TLS handshake: PEM files or a generated test cert)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is optional and handled transparently
//! - Test certificates are generated in memory and never written to disk

pub mod tls;

pub use tls::{generate_test_certificate, load_tls_config, TlsError};
