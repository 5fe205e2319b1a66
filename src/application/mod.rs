//! # Application Layer
//!
//! Use-case orchestration on top of the domain layer: services wire
//! repositories and domain rules together, DTOs shape the HTTP boundary.

pub mod dto;
pub mod services;

pub use services::*;
