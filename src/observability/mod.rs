//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! pipeline / http / upstream
//!     → logging.rs (subscriber setup, verbosity-gated diagnostic dumps)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (tracing fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured `tracing` fields, never pre-formatted strings
//! - Request id is a span field only; it is not forwarded upstream
//! - Diagnostic dumps go to the `forward_proxy::access` target so they can be
//!   filtered independently of operational logs

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, Verbosity, ACCESS_TARGET};
