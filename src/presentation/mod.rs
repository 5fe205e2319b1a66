//! Presentation Layer
//!
//! HTTP routes, handlers, and request middleware.

pub mod http;
pub mod middleware;
