//! Business logic services for the Star Wars API
//!
//! This module contains the core business logic including:
//! - Authentication and the admin bootstrap
//! - Catalog domain rules for planets, characters and starships
//! - Input validation
//! - Sample data seeding

pub mod auth;
pub mod catalog;
pub mod seed;
pub mod validation;

pub use auth::{AuthConfig, AuthService};
pub use catalog::CatalogService;
