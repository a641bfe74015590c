//! `reqwest`-backed fetch transport.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use futures_util::future::BoxFuture;
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::canonical::Headers;
use crate::config::UpstreamConfig;
use crate::pipeline::{FetchTransport, OutboundRequest, TransportError, WireResponse};

const HOP_BY_HOP: &[&str] = &[
    "content-length",
    "transfer-encoding",
    "connection",
    "proxy-connection",
    "keep-alive",
    "accept-encoding",
];

const STANDARD_METHODS: &[Method] = &[
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
];

/// Fetch transport over pooled `reqwest` clients.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Indexed by `[follow_redirects][validate_cert]`.
    clients: [[Client; 2]; 2],
}

impl ReqwestTransport {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let build = |follow: bool, validate: bool| -> Result<Client, reqwest::Error> {
            Client::builder()
                .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
                .redirect(if follow {
                    Policy::limited(config.max_redirects)
                } else {
                    Policy::none()
                })
                .danger_accept_invalid_certs(!validate)
                .no_proxy()
                .build()
        };

        Ok(Self {
            clients: [
                [build(false, false)?, build(false, true)?],
                [build(true, false)?, build(true, true)?],
            ],
        })
    }

    fn client(&self, follow_redirects: bool, validate_cert: bool) -> &Client {
        &self.clients[follow_redirects as usize][validate_cert as usize]
    }

    async fn send(
        &self,
        request: OutboundRequest,
        validate_cert: bool,
    ) -> Result<WireResponse, TransportError> {
        if !request.allow_nonstandard_methods && !STANDARD_METHODS.contains(&request.method) {
            return Err(TransportError::new(format!(
                "non-standard method {} refused",
                request.method
            )));
        }

        let headers = wire_headers(&request.headers);

        let mut builder = self
            .client(request.follow_redirects, validate_cert)
            .request(request.method, request.url)
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(error_chain(&e)))?;

        let status = response.status().as_u16();
        let headers = Headers::from(response.headers());
        match response.bytes().await {
            Ok(body) => Ok(WireResponse {
                status,
                headers,
                body,
            }),
            Err(e) => Err(TransportError::with_partial(
                error_chain(&e),
                WireResponse {
                    status,
                    headers,
                    body: Bytes::new(),
                },
            )),
        }
    }
}

impl FetchTransport for ReqwestTransport {
    fn fetch(
        &self,
        request: OutboundRequest,
        validate_cert: bool,
    ) -> BoxFuture<'_, Result<WireResponse, TransportError>> {
        Box::pin(self.send(request, validate_cert))
    }
}

/// Headers to send upstream.
///
/// Framing and hop-by-hop headers belong to the client connection; the
/// client library sets its own. `Accept-Encoding` is left to the client,
/// which decodes what it negotiates.
fn wire_headers(headers: &Headers) -> HeaderMap {
    let (mut map, rejected) = headers.to_header_map();
    if !rejected.is_empty() {
        tracing::debug!(headers = ?rejected, "Skipping headers invalid on the wire");
    }
    for name in HOP_BY_HOP {
        map.remove(*name);
    }
    map
}

/// Render an error with its sources, e.g. `error sending request: ...: Connection refused`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
