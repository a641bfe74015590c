//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing, method allow-set)
//! - Bind server to listener, plain or TLS
//! - Hand every request to the pipeline
//! - Drain in-flight requests on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::canonical::Protocol;
use crate::config::ProxyConfig;
use crate::http::middleware::{method_filter, AllowedMethods};
use crate::http::request::{into_inbound, BodyError};
use crate::net::{generate_test_certificate, load_tls_config, TlsError};
use crate::observability::Verbosity;
use crate::pipeline::{FetchTransport, Hooks, Pipeline};
use crate::upstream::ReqwestTransport;

/// Grace period for in-flight requests once shutdown starts.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub protocol: Protocol,
    pub max_body_size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("failed to build upstream client: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP server for the forward proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server that fetches upstream with the default HTTP client.
    pub fn new(config: ProxyConfig, hooks: Hooks) -> Result<Self, ServerError> {
        let transport = Arc::new(ReqwestTransport::new(&config.upstream)?);
        Ok(Self::with_transport(config, hooks, transport))
    }

    /// Create a server over a caller-supplied fetch transport.
    pub fn with_transport(config: ProxyConfig, hooks: Hooks, transport: Arc<dyn FetchTransport>) -> Self {
        let pipeline = Pipeline::new(hooks, transport)
            .with_verbosity(Verbosity::new(config.proxy.verbosity));

        let state = AppState {
            pipeline: Arc::new(pipeline),
            protocol: if config.listener.is_tls() {
                Protocol::Https
            } else {
                Protocol::Http
            },
            max_body_size: config.proxy.max_body_size,
        };
        let allowed = AllowedMethods::new(config.proxy.allowed_methods());

        let router = Self::build_router(state, allowed);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, allowed: AllowedMethods) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(allowed, method_filter))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for driving the proxy without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, accepting connections on `listener`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        let tls = if self.config.listener.test_tls {
            Some(generate_test_certificate().await?)
        } else if let Some(tls) = &self.config.listener.tls {
            Some(load_tls_config(tls.cert_path.as_ref(), tls.key_path.as_ref()).await?)
        } else {
            None
        };

        match tls {
            None => {
                tracing::info!(address = %addr, "HTTP proxy listening");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                        tracing::info!("Shutdown signal received, draining connections");
                    })
                    .await?;
            }
            Some(rustls) => {
                tracing::info!(address = %addr, "HTTPS proxy listening");
                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    tracing::info!("Shutdown signal received, draining connections");
                    drain.graceful_shutdown(Some(DRAIN_TIMEOUT));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: every request that passes the method filter is proxied.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();
    let span = tracing::info_span!(
        "proxy",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        peer = %peer,
    );

    async move {
        let inbound = match into_inbound(request, state.protocol, state.max_body_size).await {
            Ok(inbound) => inbound,
            Err(err) => {
                tracing::info!(error = %err, "Rejecting request body");
                let status = match err {
                    BodyError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    BodyError::Read(_) => StatusCode::BAD_REQUEST,
                };
                return (status, err.to_string()).into_response();
            }
        };

        match state.pipeline.handle(inbound).await {
            Ok(response) => response,
            Err(err) => {
                tracing::info!(error = %err, "Rejecting malformed request");
                (StatusCode::BAD_REQUEST, err.to_string()).into_response()
            }
        }
    }
    .instrument(span)
    .await
}
