//! Embedder-supplied hooks over canonical objects.
//!
//! # Hooks
//! - request hook: `CanonicalRequest → CanonicalRequest | CanonicalResponse`;
//!   returning a response short-circuits forwarding entirely
//! - response hook: runs on responses from a successful fetch
//! - error hook: runs on responses attached to an upstream error
//!
//! Hooks are shared read-only across every in-flight request, so they must be
//! `Send + Sync`. Unset hooks are the identity. A hook that returns `Err` or
//! panics ends the request with the hard-failure page.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::canonical::{CanonicalRequest, CanonicalResponse};

/// Failure raised by (or caught around) an embedder hook.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("{0}")]
    Failed(String),

    #[error("{stage} hook panicked: {message}")]
    Panicked { stage: HookStage, message: String },
}

impl HookError {
    pub fn new(message: impl fmt::Display) -> Self {
        HookError::Failed(message.to_string())
    }
}

/// Which hook ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Request,
    Response,
    Error,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookStage::Request => "request",
            HookStage::Response => "response",
            HookStage::Error => "error",
        })
    }
}

/// What a request hook decided.
#[derive(Debug, Clone)]
pub enum RequestAction {
    /// Forward this (possibly rewritten) request upstream.
    Forward(CanonicalRequest),
    /// Answer the client directly without contacting upstream.
    Respond(CanonicalResponse),
}

impl From<CanonicalRequest> for RequestAction {
    fn from(request: CanonicalRequest) -> Self {
        RequestAction::Forward(request)
    }
}

impl From<CanonicalResponse> for RequestAction {
    fn from(response: CanonicalResponse) -> Self {
        RequestAction::Respond(response)
    }
}

pub trait RequestHook: Send + Sync {
    fn on_request(&self, request: CanonicalRequest) -> Result<RequestAction, HookError>;
}

pub trait ResponseHook: Send + Sync {
    fn on_response(&self, response: CanonicalResponse) -> Result<CanonicalResponse, HookError>;
}

impl<F> RequestHook for F
where
    F: Fn(CanonicalRequest) -> Result<RequestAction, HookError> + Send + Sync,
{
    fn on_request(&self, request: CanonicalRequest) -> Result<RequestAction, HookError> {
        self(request)
    }
}

impl<F> ResponseHook for F
where
    F: Fn(CanonicalResponse) -> Result<CanonicalResponse, HookError> + Send + Sync,
{
    fn on_response(&self, response: CanonicalResponse) -> Result<CanonicalResponse, HookError> {
        self(response)
    }
}

/// Hook that hands its input back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl RequestHook for Identity {
    fn on_request(&self, request: CanonicalRequest) -> Result<RequestAction, HookError> {
        Ok(RequestAction::Forward(request))
    }
}

impl ResponseHook for Identity {
    fn on_response(&self, response: CanonicalResponse) -> Result<CanonicalResponse, HookError> {
        Ok(response)
    }
}

/// The three hooks of one proxy, fixed at construction.
#[derive(Clone)]
pub struct Hooks {
    request: Arc<dyn RequestHook>,
    response: Arc<dyn ResponseHook>,
    error: Arc<dyn ResponseHook>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            request: Arc::new(Identity),
            response: Arc::new(Identity),
            error: Arc::new(Identity),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

impl Hooks {
    /// Identity hooks for every stage.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_request<F>(self, hook: F) -> Self
    where
        F: Fn(CanonicalRequest) -> Result<RequestAction, HookError> + Send + Sync + 'static,
    {
        self.with_request_hook(Arc::new(hook))
    }

    pub fn on_response<F>(self, hook: F) -> Self
    where
        F: Fn(CanonicalResponse) -> Result<CanonicalResponse, HookError> + Send + Sync + 'static,
    {
        self.with_response_hook(Arc::new(hook))
    }

    pub fn on_error<F>(self, hook: F) -> Self
    where
        F: Fn(CanonicalResponse) -> Result<CanonicalResponse, HookError> + Send + Sync + 'static,
    {
        self.with_error_hook(Arc::new(hook))
    }

    pub fn with_request_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.request = hook;
        self
    }

    pub fn with_response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.response = hook;
        self
    }

    pub fn with_error_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.error = hook;
        self
    }

    pub fn run_request(&self, request: CanonicalRequest) -> Result<RequestAction, HookError> {
        guarded(HookStage::Request, || self.request.on_request(request))
    }

    pub fn run_response(&self, response: CanonicalResponse) -> Result<CanonicalResponse, HookError> {
        guarded(HookStage::Response, || self.response.on_response(response))
    }

    pub fn run_error(&self, response: CanonicalResponse) -> Result<CanonicalResponse, HookError> {
        guarded(HookStage::Error, || self.error.on_response(response))
    }
}

fn guarded<T>(
    stage: HookStage,
    hook: impl FnOnce() -> Result<T, HookError>,
) -> Result<T, HookError> {
    match panic::catch_unwind(AssertUnwindSafe(hook)) {
        Ok(result) => result,
        Err(payload) => Err(HookError::Panicked {
            stage,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
