//! Middleware and extractors for the Star Wars API

pub mod auth;

pub use auth::{AuthRejection, AuthUser, MaybeAuthUser};
