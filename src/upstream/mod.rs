//! Upstream fetch subsystem.
//!
//! # Responsibilities
//! - Issue outbound requests built by the pipeline
//! - Own connection pooling, DNS, TLS verification, redirects and timeouts
//! - Report failures with whatever partial response arrived
//!
//! # Design Decisions
//! - One pooled `reqwest` client per (redirect, cert-validation) combination,
//!   built up front so requests never construct clients
//! - Decompression is owned by the transport: the client's `Accept-Encoding`
//!   is replaced by the transport's own negotiation

pub mod client;

pub use client::ReqwestTransport;
