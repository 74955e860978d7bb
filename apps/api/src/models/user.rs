//! User and authentication models
//!
//! This module contains the database model for user accounts and the JWT
//! claims carried by access tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::EntityId;

/// JWT issuer and audience for access tokens
pub const TOKEN_ISSUER: &str = "starwars-api";

/// User role stored as lowercase text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    /// Parse a role name as accepted by the registration endpoint
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

/// User account record from the users table
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Store-assigned identifier
    pub id: EntityId,

    /// Unique login name
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Argon2id password hash (never serialized)
    pub hashed_password: String,

    /// Account role
    pub role: UserRole,
}

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// User ID
    pub id: EntityId,

    /// User's role
    pub role: UserRole,

    /// Issued at timestamp (Unix epoch)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch)
    pub exp: i64,

    /// Issuer
    #[serde(default = "default_issuer")]
    pub iss: String,

    /// Audience
    #[serde(default = "default_issuer")]
    pub aud: String,
}

fn default_issuer() -> String {
    TOKEN_ISSUER.to_string()
}

impl Claims {
    /// Create new claims for a user
    pub fn new(user: &User, access_token_ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.username.clone(),
            id: user.id,
            role: user.role,
            iat: now,
            exp: now + access_token_ttl_secs,
            iss: default_issuer(),
            aud: default_issuer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: EntityId::new(3),
            username: "han".to_string(),
            email: "han@falcon.io".to_string(),
            hashed_password: "hash".to_string(),
            role: UserRole::User,
        }
    }

    #[test]
    fn test_claims_new() {
        let claims = Claims::new(&test_user(), 1800);
        assert_eq!(claims.sub, "han");
        assert_eq!(claims.id, EntityId::new(3));
        assert_eq!(claims.exp - claims.iat, 1800);
        assert_eq!(claims.iss, TOKEN_ISSUER);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("user"), Some(UserRole::User));
        assert_eq!(UserRole::parse("Admin"), None);
        assert_eq!(UserRole::default().as_str(), "user");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&UserRole::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
    }
}
