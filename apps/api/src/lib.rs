//! Star Wars catalog API library
//!
//! This module exposes the core API components for use in integration tests
//! and by the server binary.

pub mod app;
pub mod config;
pub mod error;
pub mod graphql;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use app::{build_cors_layer, build_router, AppState};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use graphql::loaders::{attach_loaders, BatchConfig, LoaderRegistry};
pub use graphql::{build_schema, StarWarsSchema};
pub use services::{AuthConfig, AuthService, CatalogService};
