//! API server configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use starwars_shared_config::{parse_bool_env, parse_env, CommonConfig, DatabaseConfig, Environment};

use crate::graphql::loaders::BatchConfig;

/// Minimum required length for JWT_SECRET to be considered secure
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Development-only admin password used when ADMIN_PASSWORD is unset
const DEV_ADMIN_PASSWORD: &str = "admin123";

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other binaries
    pub common: CommonConfig,

    /// Server port (default: 4000)
    pub port: u16,

    /// JWT secret for authentication
    pub jwt_secret: String,

    /// JWT access token expiry (default: 30m)
    pub jwt_access_expiry: String,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,

    /// Seed the sample catalog when it is empty (default: true)
    pub seed_on_startup: bool,

    /// Password for the bootstrap admin account, if one should be created
    pub admin_password: Option<String>,

    /// Loader accumulation window in milliseconds (default: 1)
    pub loader_batch_delay_ms: u64,

    /// Maximum keys per loader window (default: 500)
    pub loader_max_batch_size: usize,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode, this function requires:
    /// - `JWT_SECRET`: Must be set and at least 32 characters long
    /// - `DATABASE_URL`: Must be explicitly set
    ///
    /// The admin account is only bootstrapped in production when
    /// `ADMIN_PASSWORD` is set.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();
        let is_production = environment.is_production();

        let jwt_secret = Self::load_jwt_secret(is_production)?;

        if is_production {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env().context("Failed to load config")?;

        let loader_max_batch_size: usize =
            parse_env("LOADER_MAX_BATCH_SIZE", 500).context("Invalid LOADER_MAX_BATCH_SIZE value")?;
        if loader_max_batch_size == 0 {
            bail!("LOADER_MAX_BATCH_SIZE must be at least 1");
        }

        let jwt_access_expiry =
            env::var("JWT_ACCESS_EXPIRY").unwrap_or_else(|_| "30m".to_string());
        if crate::services::auth::parse_duration_string(&jwt_access_expiry).is_none() {
            bail!(
                "Invalid JWT_ACCESS_EXPIRY value '{}' (expected e.g. 30m, 1h, 7d)",
                jwt_access_expiry
            );
        }

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("Invalid PORT value")?,

            jwt_secret,

            jwt_access_expiry,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),

            seed_on_startup: parse_bool_env("SEED_ON_STARTUP", true)
                .context("Invalid SEED_ON_STARTUP value")?,

            admin_password: Self::load_admin_password(is_production),

            loader_batch_delay_ms: parse_env("LOADER_BATCH_DELAY_MS", 1)
                .context("Invalid LOADER_BATCH_DELAY_MS value")?,

            loader_max_batch_size,
        })
    }

    /// Load and validate JWT_SECRET
    ///
    /// In production:
    /// - JWT_SECRET must be explicitly set
    /// - Must be at least MIN_JWT_SECRET_LENGTH characters
    ///
    /// In development: uses a default value with a warning
    fn load_jwt_secret(is_production: bool) -> Result<String> {
        match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => {
                if is_production && secret.len() < MIN_JWT_SECRET_LENGTH {
                    bail!(
                        "JWT_SECRET must be at least {} characters in production (got {})",
                        MIN_JWT_SECRET_LENGTH,
                        secret.len()
                    );
                }
                Ok(secret)
            }
            _ if is_production => {
                bail!(
                    "JWT_SECRET environment variable is required in production. \
                     Please set a secure secret of at least {} characters.",
                    MIN_JWT_SECRET_LENGTH
                );
            }
            _ => {
                tracing::warn!(
                    "JWT_SECRET not set, using insecure default. \
                     This is only acceptable in development mode."
                );
                Ok("development-secret-change-in-production".to_string())
            }
        }
    }

    /// Load ADMIN_PASSWORD, falling back to a default outside production
    fn load_admin_password(is_production: bool) -> Option<String> {
        match env::var("ADMIN_PASSWORD") {
            Ok(password) if !password.is_empty() => Some(password),
            _ if is_production => None,
            _ => Some(DEV_ADMIN_PASSWORD.to_string()),
        }
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your SQLite database URL."
                );
            }
        }
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Accumulation window settings for the request loaders
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            delay: Duration::from_millis(self.loader_batch_delay_ms),
            max_batch_size: self.loader_max_batch_size,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
