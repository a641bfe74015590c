//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Gate request/response diagnostic dumps by verbosity level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Target used for per-request diagnostic dumps.
pub const ACCESS_TARGET: &str = "forward_proxy::access";

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this crate and to
/// `tower_http`. Calling twice is harmless.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("forward_proxy={level},tower_http={level}").into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// How much of each request/response the pipeline dumps.
///
/// - 1: one summary line per forwarded request
/// - 2: outbound wire request and emitted response headers
/// - 3: canonical request and response objects
/// - 4: raw inbound request and raw upstream response
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const MAX: u8 = 4;

    /// Clamp `level` into `0..=4`.
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn summary(&self) -> bool {
        self.0 >= 1
    }

    pub fn wire(&self) -> bool {
        self.0 >= 2
    }

    pub fn canonical(&self) -> bool {
        self.0 >= 3
    }

    pub fn raw(&self) -> bool {
        self.0 >= 4
    }
}
