//! Database Module
//!
//! Provides PostgreSQL connection pool management. Schema migrations run
//! at connect time so a fresh database is usable immediately.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection acquisition timeout
    pub acquire_timeout_secs: u64,
    /// Idle connection timeout
    pub idle_timeout_secs: u64,
    /// Maximum connection lifetime
    pub max_lifetime_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            // CRUD workload: modest pool, fast failure detection
            max_connections: 20,
            min_connections: 2,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,  // 5 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

impl DatabaseConfig {
    /// Create config from environment variables
    pub fn from_env(database_url: &str) -> Self {
        Self {
            url: database_url.to_string(),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            acquire_timeout_secs: std::env::var("DB_ACQUIRE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            idle_timeout_secs: std::env::var("DB_IDLE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            max_lifetime_secs: std::env::var("DB_MAX_LIFETIME")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
        }
    }
}

/// Database connection wrapper
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    /// Connect to database with default settings and run pending migrations
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let config = DatabaseConfig::from_env(database_url);
        Self::connect_with_config(config).await
    }

    /// Connect to database with custom configuration
    pub async fn connect_with_config(config: DatabaseConfig) -> anyhow::Result<Self> {
        tracing::info!(
            "Connecting to database with pool config: max={}, min={}, acquire_timeout={}s",
            config.max_connections,
            config.min_connections,
            config.acquire_timeout_secs
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .test_before_acquire(true)
            .connect(&config.url)
            .await?;

        sqlx::migrate!().run(&pool).await?;

        tracing::info!(
            "Database pool established: size={}, idle={}",
            pool.size(),
            pool.num_idle()
        );

        Ok(Self { pool })
    }

    /// Check if database is healthy
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout_secs, 5);
    }
}
