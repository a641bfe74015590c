//! Wire request → [`InboundRequest`].
//!
//! # Responsibilities
//! - Buffer the body up to the configured cap
//! - Resolve the declared host (`Host` header, then URI authority)
//! - Record the protocol the listener speaks

use axum::body::Body;
use axum::http::header::HOST;
use axum::http::Request;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::canonical::{Headers, Protocol};
use crate::pipeline::InboundRequest;

/// The inbound body could not be buffered.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Buffer `request` and describe it for the pipeline.
pub async fn into_inbound(
    request: Request<Body>,
    protocol: Protocol,
    max_body_size: usize,
) -> Result<InboundRequest, BodyError> {
    let (parts, body) = request.into_parts();

    let host = parts
        .headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| parts.uri.authority().map(|a| a.to_string()))
        .unwrap_or_default();

    let body = match Limited::new(body, max_body_size).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            return Err(BodyError::TooLarge { limit: max_body_size });
        }
        Err(err) => return Err(BodyError::Read(err.to_string())),
    };

    Ok(InboundRequest {
        method: parts.method,
        uri: parts.uri.to_string(),
        protocol,
        host,
        headers: Headers::from(&parts.headers),
        body,
    })
}
