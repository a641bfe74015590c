//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, verbosity 0..=4)
//! - Detect conflicting options (file TLS and test TLS together)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::Method;

use crate::config::schema::ProxyConfig;
use crate::observability::Verbosity;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not an IP address")]
    InvalidBindAddress(String),

    #[error("listener.tls and listener.test_tls are mutually exclusive")]
    ConflictingTls,

    #[error("proxy.methods must not be empty")]
    NoMethods,

    #[error("proxy.methods contains invalid method '{0}'")]
    InvalidMethod(String),

    #[error("proxy.verbosity {0} exceeds maximum {max}", max = Verbosity::MAX)]
    VerbosityTooHigh(u8),

    #[error("proxy.max_body_size must be greater than zero")]
    ZeroBodySize,

    #[error("upstream.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check `config` for semantic problems, reporting every one found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.socket_addr().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.test_tls && config.listener.tls.is_some() {
        errors.push(ValidationError::ConflictingTls);
    }

    if config.proxy.methods.is_empty() {
        errors.push(ValidationError::NoMethods);
    }
    for method in &config.proxy.methods {
        if method.is_empty() || Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod(method.clone()));
        }
    }
    if config.proxy.verbosity > Verbosity::MAX {
        errors.push(ValidationError::VerbosityTooHigh(config.proxy.verbosity));
    }
    if config.proxy.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodySize);
    }

    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_secs"));
    }
    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_timeout_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
