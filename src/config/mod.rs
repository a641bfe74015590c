//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → CLI overrides applied in main, then validated again
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ProxyConfig;
pub use schema::{ForwardingConfig, ListenerConfig, ObservabilityConfig, TlsConfig, UpstreamConfig};
pub use validation::{validate_config, ValidationError};
