//! Database configuration loaded from environment variables.

use std::time::Duration;

/// Reads from environment variables:
/// - `DATABASE_URL`: SQLite connection string (default: `"sqlite://catalog.db?mode=rwc"`)
/// - `DB_MAX_CONNECTIONS`: pool size (default: `1`, a single writer)
/// - `DB_CONNECT_TIMEOUT_SECS`: connect timeout (default: `5`)
/// - `DB_ACQUIRE_TIMEOUT_SECS`: how long an operation waits for a pooled connection (default: `5`)
/// - `DB_SQL_LOGGING`: log every statement at debug level (default: `false`)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub sql_logging: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
            connect_timeout: env_parse("DB_CONNECT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            acquire_timeout: env_parse("DB_ACQUIRE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            sql_logging: env_parse("DB_SQL_LOGGING").unwrap_or(defaults.sql_logging),
        }
    }

    /// A private in-memory database. Every pooled connection to `sqlite::memory:`
    /// opens a separate database, so the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://catalog.db?mode=rwc".to_string(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(5),
            sql_logging: false,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.trim().parse().ok())
}
