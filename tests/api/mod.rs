//! REST API endpoint tests.

mod auth_tests;
mod comment_tests;
mod health_tests;
mod post_tests;
mod user_tests;
