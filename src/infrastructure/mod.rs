//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database connection pool and migrations (PostgreSQL)
//! - Repository implementations backing the domain traits

pub mod database;
pub mod repositories;
