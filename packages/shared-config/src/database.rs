//! Database configuration types

use crate::{get_env_or_default, parse_env, ConfigError, ConfigResult};

/// Default SQLite database location, created on first start
const DEFAULT_DATABASE_URL: &str = "sqlite://starwars.db";

/// SQLite database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL (e.g., sqlite://starwars.db or sqlite::memory:)
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Load database configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let url = get_env_or_default("DATABASE_URL", DEFAULT_DATABASE_URL);
        if !url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidUrl(
                "DATABASE_URL".to_string(),
                format!("expected a sqlite: URL, got '{}'", url),
            ));
        }

        Ok(Self {
            url,
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5)?,
            connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT", 30)?,
        })
    }

    /// Create a configuration with a custom URL (useful for testing)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Whether this configuration points at a private in-memory database
    ///
    /// Every connection to `sqlite::memory:` opens its own empty database,
    /// so such pools must be limited to a single long-lived connection.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            connect_timeout_secs: 30,
        }
    }
}
