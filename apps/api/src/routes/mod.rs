//! HTTP route handlers for the Star Wars API
//!
//! This module contains the REST endpoint handlers:
//! - Authentication endpoints
//! - Health check and status endpoints
//!
//! The GraphQL endpoint itself is mounted in `main.rs`.

pub mod auth;
pub mod health;

pub use auth::{auth_router, AuthState};
pub use health::{health_router, HealthState};
