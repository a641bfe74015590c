//! Fetch dispatch: issue the upstream request and classify what came back.
//!
//! # Outcomes
//! - `Success`: a 2xx response; continues on the response-hook path
//! - `UpstreamError`: upstream sent something (non-2xx status, or a response
//!   that broke off mid-body); continues on the error-hook path
//! - `Unreachable`: nothing came back at all; no hook runs

use axum::body::Bytes;
use futures_util::future::BoxFuture;

use super::outbound::OutboundRequest;
use crate::canonical::Headers;

/// A response as received from upstream.
#[derive(Debug, Clone, Default)]
pub struct WireResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

/// Failure reported by a fetch transport.
///
/// `partial` holds whatever upstream managed to send before the failure.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    partial: Option<WireResponse>,
}

impl TransportError {
    /// A failure where upstream sent nothing usable.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            partial: None,
        }
    }

    /// A failure after upstream had already started responding.
    pub fn with_partial(message: impl Into<String>, partial: WireResponse) -> Self {
        Self {
            message: message.into(),
            partial: Some(partial),
        }
    }

    pub fn partial(&self) -> Option<&WireResponse> {
        self.partial.as_ref()
    }

    pub fn into_partial(self) -> Option<WireResponse> {
        self.partial
    }
}

/// The outbound fetch capability.
///
/// Implementations own connection handling, DNS, TLS and timeouts.
pub trait FetchTransport: Send + Sync {
    fn fetch(
        &self,
        request: OutboundRequest,
        validate_cert: bool,
    ) -> BoxFuture<'_, Result<WireResponse, TransportError>>;
}

/// Classified result of one upstream fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(WireResponse),
    UpstreamError { response: WireResponse, reason: String },
    Unreachable(TransportError),
}

impl FetchOutcome {
    pub fn classify(result: Result<WireResponse, TransportError>) -> Self {
        match result {
            Ok(response) if (200..300).contains(&response.status) => FetchOutcome::Success(response),
            Ok(response) => {
                let reason = format!("upstream responded with HTTP {}", response.status);
                FetchOutcome::UpstreamError { response, reason }
            }
            Err(err) => {
                let reason = err.to_string();
                match err.into_partial() {
                    Some(response) => FetchOutcome::UpstreamError { response, reason },
                    None => FetchOutcome::Unreachable(TransportError::new(reason)),
                }
            }
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Success(_) => "success",
            FetchOutcome::UpstreamError { .. } => "upstream_error",
            FetchOutcome::Unreachable(_) => "unreachable",
        }
    }
}

/// Send `request` through `transport` and classify the result.
pub async fn dispatch(
    transport: &dyn FetchTransport,
    request: OutboundRequest,
    validate_cert: bool,
) -> FetchOutcome {
    let url = request.url.clone();
    let outcome = FetchOutcome::classify(transport.fetch(request, validate_cert).await);

    let label = outcome.label();
    match &outcome {
        FetchOutcome::Success(response) => {
            tracing::debug!(url = %url, outcome = label, status = response.status, "Upstream responded");
        }
        FetchOutcome::UpstreamError { reason, .. } => {
            tracing::info!(url = %url, outcome = label, reason = %reason, "Upstream error with response");
        }
        FetchOutcome::Unreachable(err) => {
            tracing::warn!(url = %url, outcome = label, error = %err, "Upstream unreachable");
        }
    }
    outcome
}
