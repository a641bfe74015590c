//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashSet;
use std::net::{AddrParseError, IpAddr, SocketAddr};

use axum::http::Method;
use serde::{Deserialize, Serialize};

/// Root configuration for the forward proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, port, TLS, workers).
    pub listener: ListenerConfig,

    /// Request handling: allowed methods, diagnostics, body cap.
    pub proxy: ForwardingConfig,

    /// Outbound fetch settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind IP address (e.g., "0.0.0.0").
    pub bind_address: String,

    /// Listening port.
    pub port: u16,

    /// Serve TLS from PEM files.
    pub tls: Option<TlsConfig>,

    /// Serve TLS with a self-signed certificate generated at startup.
    pub test_tls: bool,

    /// Runtime worker threads; 0 means one per CPU core.
    pub workers: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8888,
            tls: None,
            test_tls: false,
            workers: 0,
        }
    }
}

impl ListenerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.bind_address.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Whether the listener speaks TLS.
    pub fn is_tls(&self) -> bool {
        self.test_tls || self.tls.is_some()
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Request handling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// HTTP methods the proxy accepts; others get 405.
    pub methods: Vec<String>,

    /// Diagnostic dump level, 0 (off) to 4 (raw requests and responses).
    pub verbosity: u8,

    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            methods: vec!["GET".to_string(), "POST".to_string()],
            verbosity: 0,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

impl ForwardingConfig {
    /// The configured methods that parse as HTTP methods.
    pub fn allowed_methods(&self) -> HashSet<Method> {
        self.methods
            .iter()
            .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
            .collect()
    }
}

/// Outbound fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total upstream request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Idle pooled connection lifetime in seconds.
    pub pool_idle_timeout_secs: u64,

    /// Redirect hops followed when a request asks for it.
    pub max_redirects: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 20,
            request_timeout_secs: 20,
            pool_idle_timeout_secs: 90,
            max_redirects: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
