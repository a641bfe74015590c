//! Method allow-set middleware.
//! Rejects verbs the proxy is not configured to serve.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::ALLOW, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The set of methods the proxy accepts.
#[derive(Debug, Clone)]
pub struct AllowedMethods(Arc<HashSet<Method>>);

impl AllowedMethods {
    pub fn new(methods: HashSet<Method>) -> Self {
        Self(Arc::new(methods))
    }

    pub fn contains(&self, method: &Method) -> bool {
        self.0.contains(method)
    }

    /// Value for the `Allow` header, sorted for stable output.
    pub fn allow_header(&self) -> String {
        let mut names: Vec<&str> = self.0.iter().map(Method::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }
}

pub async fn method_filter(
    State(allowed): State<AllowedMethods>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if allowed.contains(req.method()) {
        return next.run(req).await;
    }

    tracing::info!(method = %req.method(), uri = %req.uri(), "Method not allowed");
    let mut response = (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    if let Ok(value) = HeaderValue::from_str(&allowed.allow_header()) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}
