//! Startup orchestration.
//!
//! # Responsibilities
//! - Size the Tokio runtime from `listener.workers`
//! - Initialize metrics before traffic arrives
//! - Bind listeners and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use tokio::net::TcpListener;
use tokio::runtime::{Builder, Runtime};

use crate::config::ProxyConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::pipeline::Hooks;

/// Multi-thread runtime with `workers` threads, or one per core when zero.
pub fn build_runtime(workers: usize) -> std::io::Result<Runtime> {
    let mut builder = Builder::new_multi_thread();
    builder.enable_all();
    if workers > 0 {
        builder.worker_threads(workers);
    }
    builder.build()
}

/// Bring the proxy up with `hooks` and serve until SIGINT/SIGTERM.
pub async fn run_proxy(config: ProxyConfig, hooks: Hooks) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let addr = config.listener.socket_addr()?;
    let server = HttpServer::new(config, hooks)?;
    let listener = TcpListener::bind(addr).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::wait_for_signal(shutdown));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
