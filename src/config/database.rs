use crate::core::{AppError, Result};
use serde::Deserialize;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// MySQL settings. One office server plus the occasional import run, so
/// the pool stays small and gives up quickly when the database is away.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Connections kept open while idle (`DATABASE_POOL_SIZE`)
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

    pub fn from_env() -> Result<Self> {
        Ok(DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Configuration("DATABASE_URL not set".to_string()))?,
            min_connections: env_or(
                "DATABASE_POOL_SIZE",
                env::var("DATABASE_POOL_SIZE").ok(),
                Self::DEFAULT_MIN_CONNECTIONS,
            )?,
            max_connections: env_or(
                "DATABASE_MAX_CONNECTIONS",
                env::var("DATABASE_MAX_CONNECTIONS").ok(),
                Self::DEFAULT_MAX_CONNECTIONS,
            )?,
            acquire_timeout_secs: env_or(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                env::var("DATABASE_ACQUIRE_TIMEOUT_SECS").ok(),
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
        })
    }

    pub fn pool_options(&self) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(300))
            .test_before_acquire(true)
    }

    /// Create a MySQL connection pool
    pub async fn create_pool(&self) -> Result<MySqlPool> {
        let pool = self
            .pool_options()
            .connect(&self.url)
            .await
            .map_err(AppError::Database)?;

        tracing::debug!(
            min_connections = self.min_connections,
            max_connections = self.max_connections,
            "MySQL pool ready"
        );
        Ok(pool)
    }
}

fn env_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}: '{}'", key, raw))),
        None => Ok(default),
    }
}
