//! User repository for centralized database operations
//!
//! This module provides all user-related database operations in a single location,
//! following the repository pattern.

use sqlx::SqlitePool;

use super::utils::USER_COLUMNS;
use crate::models::{EntityId, User, UserRole};

/// Repository for user database operations
///
/// Centralizes all user-related database queries to avoid duplication
/// across middleware and services.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new UserRepository instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user by their unique ID
    ///
    /// # Returns
    /// * `Ok(Some(User))` - If the user exists
    /// * `Ok(None)` - If no user with the given ID exists
    /// * `Err(sqlx::Error)` - If a database error occurs
    pub async fn find_by_id(&self, id: EntityId) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Find a user by their login name (exact match)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    /// Check if a username or email address is already registered
    ///
    /// Emails are compared case-insensitively.
    pub async fn username_or_email_exists(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? OR email = ?)",
        )
        .bind(username)
        .bind(email.to_lowercase())
        .fetch_one(&self.pool)
        .await
    }

    /// Create a new user in the database
    ///
    /// # Arguments
    /// * `username` - Login name (must be unique)
    /// * `email` - Email address (must be unique, stored lowercase)
    /// * `hashed_password` - Pre-hashed password (Argon2id)
    /// * `role` - Account role
    ///
    /// # Returns
    /// * `Ok(User)` - The newly created user
    /// * `Err(sqlx::Error)` - If a database error occurs (including unique constraint violations)
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
        role: UserRole,
    ) -> Result<User, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users (username, email, hashed_password, role) VALUES (?, ?, ?, ?) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(email.to_lowercase())
            .bind(hashed_password)
            .bind(role)
            .fetch_one(&self.pool)
            .await
    }
}
