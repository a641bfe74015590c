//! Forward HTTP proxy
//!
//! A programmable forward proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌────────────────────────────────────────────────────────┐
//!                         │                    FORWARD PROXY                        │
//!                         │                                                         │
//!     Client Request      │  ┌─────────┐    ┌─────────┐    ┌───────────────────┐   │
//!     ────────────────────┼─▶│   net   │───▶│  http   │───▶│ inbound translator │   │
//!                         │  │  (tls)  │    │ server  │    └─────────┬─────────┘   │
//!                         │  └─────────┘    └─────────┘              ▼             │
//!                         │                                  ┌──────────────┐      │
//!                         │                                  │ request hook │──┐   │
//!                         │                                  └──────┬───────┘  │   │
//!                         │                                         ▼          │   │
//!                         │                                  ┌──────────────┐  │   │
//!                         │                                  │   upstream   │◀─┼───┼─▶ Origin
//!                         │                                  │    fetch     │  │   │   Server
//!                         │                                  └──────┬───────┘  │   │
//!                         │                                         ▼          │   │
//!     Client Response     │  ┌─────────┐    ┌──────────────────────────────┐  │   │
//!     ◀───────────────────┼──│ emitter │◀───│ response hook | error hook   │◀─┘   │
//!                         │  └─────────┘    └──────────────────────────────┘      │
//!                         └────────────────────────────────────────────────────────┘
//! ```
//!
//! Run without hooks this binary is a transparent forward proxy; embedders
//! link the library and pass their own [`Hooks`] to `run_proxy`.

use std::path::PathBuf;

use clap::Parser;

use forward_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use forward_proxy::lifecycle::{build_runtime, run_proxy};
use forward_proxy::observability::init_logging;
use forward_proxy::Hooks;

#[derive(Parser, Debug)]
#[command(name = "forward-proxy", version, about = "Programmable forward HTTP proxy")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port (overrides the config file).
    #[arg(short, long)]
    port: Option<u16>,

    /// Diagnostic dump level, 0 to 4 (overrides the config file).
    #[arg(short, long)]
    verbosity: Option<u8>,

    /// Serve TLS with a generated self-signed certificate.
    #[arg(long)]
    test_tls: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(port) = args.port {
        config.listener.port = port;
    }
    if let Some(verbosity) = args.verbosity {
        config.proxy.verbosity = verbosity;
    }
    if args.test_tls {
        config.listener.test_tls = true;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        port = config.listener.port,
        tls = config.listener.is_tls(),
        methods = ?config.proxy.methods,
        verbosity = config.proxy.verbosity,
        "forward-proxy v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let runtime = build_runtime(config.listener.workers)?;
    runtime.block_on(run_proxy(config, Hooks::new()))
}
