//! Authentication service for the Star Wars API
//!
//! This module provides authentication functionality:
//! - User registration with Argon2id password hashing
//! - Login with JWT access token generation
//! - Access token verification
//! - Bootstrap of the initial admin account

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;

use crate::error::{ApiError, ApiResult};
use crate::models::user::TOKEN_ISSUER;
use crate::models::{Claims, User, UserRole};
use crate::repositories::UserRepository;

/// Username of the bootstrapped administrator
pub const ADMIN_USERNAME: &str = "admin";

const DEFAULT_ACCESS_TTL_SECS: i64 = 30 * 60;

/// Authentication service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token TTL in seconds (default: 30 minutes)
    pub access_token_ttl_secs: i64,
    /// JWT issuer
    pub issuer: String,
    /// JWT audience
    pub audience: String,
}

impl AuthConfig {
    /// Create a new AuthConfig with the default TTL
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            access_token_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            issuer: TOKEN_ISSUER.to_string(),
            audience: TOKEN_ISSUER.to_string(),
        }
    }

    /// Create AuthConfig from an expiry string (e.g., "30m", "12h")
    pub fn with_expiry_string(jwt_secret: String, access_expiry: &str) -> Self {
        Self {
            access_token_ttl_secs: parse_duration_string(access_expiry)
                .unwrap_or(DEFAULT_ACCESS_TTL_SECS),
            ..Self::new(jwt_secret)
        }
    }
}

/// Parse duration strings like "15m", "7d", "24h" to seconds
pub fn parse_duration_string(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let unit_start = s.char_indices().last()?.0;
    let (num_str, unit) = s.split_at(unit_start);
    let num: i64 = num_str.parse().ok()?;

    match unit {
        "s" => Some(num),
        "m" => Some(num * 60),
        "h" => Some(num * 3600),
        "d" => Some(num * 24 * 3600),
        "w" => Some(num * 7 * 24 * 3600),
        _ => None,
    }
}

/// Registration request after deserialization
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// Authentication service providing registration, login, and token verification
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    config: AuthConfig,
    argon2: Argon2<'static>,
    /// Pre-computed dummy hash for timing attack prevention.
    /// We verify against this hash when a user is not found to ensure
    /// consistent response times regardless of whether the username exists.
    dummy_password_hash: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(pool: SqlitePool, config: AuthConfig) -> Self {
        let argon2 = Argon2::default();

        let dummy_salt = SaltString::generate(&mut OsRng);
        let dummy_password_hash = argon2
            .hash_password(b"dummy_password_for_timing_attack_prevention", &dummy_salt)
            .expect("dummy password hashing should not fail")
            .to_string();

        Self {
            users: UserRepository::new(pool),
            config,
            argon2,
            dummy_password_hash,
        }
    }

    /// Access token lifetime in seconds
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.config.access_token_ttl_secs
    }

    /// Register a new user account
    ///
    /// # Errors
    /// - `ApiError::ValidationError` if username, email, password or role is invalid
    /// - `ApiError::Conflict` if the username or email is already taken
    pub async fn register(&self, registration: Registration) -> ApiResult<User> {
        let username = registration.username.trim();
        let email = registration.email.trim();

        let username_len = username.chars().count();
        if !(3..=50).contains(&username_len) {
            return Err(ApiError::ValidationError(
                "username must be between 3 and 50 characters".to_string(),
            ));
        }

        if !is_valid_email(email) {
            return Err(ApiError::ValidationError(
                "invalid email format".to_string(),
            ));
        }

        let password_len = registration.password.chars().count();
        if !(6..=72).contains(&password_len) {
            return Err(ApiError::ValidationError(
                "password must be between 6 and 72 characters".to_string(),
            ));
        }

        let role = match registration.role.as_deref() {
            None => UserRole::User,
            Some(role) => UserRole::parse(role).ok_or_else(|| {
                ApiError::ValidationError("role must be either 'user' or 'admin'".to_string())
            })?,
        };

        if self.users.username_or_email_exists(username, email).await? {
            return Err(ApiError::conflict("user", username));
        }

        let hashed_password = self.hash_password(&registration.password)?;

        let user = self
            .users
            .create(username, email, &hashed_password, role)
            .await
            .map_err(|e| ApiError::from_write(e, "user", username))?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered successfully");

        Ok(user)
    }

    /// Authenticate a user and issue an access token
    ///
    /// # Errors
    /// - `ApiError::Unauthorized` if credentials are invalid
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<(User, String)> {
        let user = self.users.find_by_username(username.trim()).await?;

        // Verify a hash even for unknown users so response time does not
        // reveal which usernames exist.
        let (user, password_valid) = match user {
            Some(u) => {
                let valid = self.verify_password(password, &u.hashed_password)?;
                (Some(u), valid)
            }
            None => {
                let _ = self.verify_password(password, &self.dummy_password_hash);
                (None, false)
            }
        };

        let user = match (user, password_valid) {
            (Some(u), true) => u,
            (Some(_), false) => {
                tracing::warn!(username = %username, "Login failed: invalid password");
                return Err(ApiError::Unauthorized);
            }
            (None, _) => {
                tracing::warn!(username = %username, "Login failed: user not found");
                return Err(ApiError::Unauthorized);
            }
        };

        let token = self.issue_access_token(&user)?;

        tracing::info!(user_id = %user.id, username = %user.username, "User logged in successfully");

        Ok((user, token))
    }

    /// Look up the account behind verified claims
    ///
    /// # Errors
    /// - `ApiError::Unauthorized` if the account no longer exists
    pub async fn current_user(&self, claims: &Claims) -> ApiResult<User> {
        self.users
            .find_by_id(claims.id)
            .await?
            .ok_or(ApiError::Unauthorized)
    }

    /// Create the admin account unless it already exists
    ///
    /// Returns `true` if an account was created.
    pub async fn ensure_admin_user(&self, password: &str) -> ApiResult<bool> {
        if self.users.find_by_username(ADMIN_USERNAME).await?.is_some() {
            tracing::debug!("Admin user already exists");
            return Ok(false);
        }

        let hashed_password = self.hash_password(password)?;
        let admin = self
            .users
            .create(
                ADMIN_USERNAME,
                "admin@starwars.local",
                &hashed_password,
                UserRole::Admin,
            )
            .await
            .map_err(|e| ApiError::from_write(e, "user", ADMIN_USERNAME))?;

        tracing::info!(user_id = %admin.id, "Admin user created");
        Ok(true)
    }

    /// Issue a signed access token for a user
    pub fn issue_access_token(&self, user: &User) -> ApiResult<String> {
        let claims = Claims::new(user, self.config.access_token_ttl_secs);
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify an access token and return its claims
    ///
    /// # Errors
    /// - `ApiError::InvalidToken` if token is invalid, expired, or malformed
    pub fn verify_access_token(&self, token: &str) -> ApiResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Access token verification failed");
            ApiError::InvalidToken(e.to_string())
        })?;

        Ok(token_data.claims)
    }

    /// Hash a password with Argon2id
    fn hash_password(&self, password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against an Argon2id hash
    fn verify_password(&self, password: &str, hash: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| ApiError::Internal(format!("Invalid password hash format: {}", e)))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// The scheme is matched case-insensitively; anything other than exactly
/// two parts is rejected.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;

    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

/// Simple email validation
fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > 254 {
        return false;
    }

    // Must have exactly one @ symbol
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    if local.is_empty() || local.len() > 64 {
        return false;
    }

    // Domain must have at least one dot and no empty labels
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|part| !part.is_empty())
}
