//! HTTP surface: extractors, routes, and handlers.

pub mod extractors;
pub mod handlers;
pub mod routes;
