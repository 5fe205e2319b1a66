//! # Social Server Library
//!
//! This crate provides a social-networking backend with:
//! - RESTful HTTP API endpoints
//! - Token-based authentication with refresh sessions
//! - Posts with visibility levels and likes
//! - Depth-limited threaded comments
//! - PostgreSQL for persistent storage
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and repository traits
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database and repository implementations
//! - **Presentation Layer**: HTTP routes, handlers, and middleware
//!
//! ## Module Structure
//!
//! ```text
//! social_server/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities, policies, and traits
//! +-- application/   Application services and DTOs
//! +-- infrastructure/ Database and repository implementations
//! +-- presentation/  HTTP routes and handlers
//! +-- shared/        Common utilities (errors, snowflake IDs, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
