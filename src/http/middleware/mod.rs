//! Request middleware applied ahead of the proxy handler.

pub mod method_filter;

pub use method_filter::{method_filter, AllowedMethods};
