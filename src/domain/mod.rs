//! # Domain Layer
//!
//! The domain layer contains the core business logic of the social server.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, Post, Comment, etc.)
//! - **services**: Domain services (authorization policy)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Pure business logic and domain rules
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;
pub mod services;

// Re-export commonly used types
pub use entities::*;
pub use services::{Action, Actor, Decision, PolicyService};
