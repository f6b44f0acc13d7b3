//! Database connection and pool management
//!
//! Pool sizing and timeouts come from the `database` config section. Also
//! home of the embedded migrations, the `SELECT 1` probe behind
//! `/health/ready` and the startup readiness gate.

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use tracing::{info, warn};

pub mod readiness;

pub use readiness::{wait_for_db, CheckError, ConnectionCheck, PgConnectionCheck, WaitReport};

const APPLICATION_NAME: &str = "recipe-api";

/// Pool options for the configured limits. Connections are pinged before
/// being handed out so a restarted server does not surface as request errors.
pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .test_before_acquire(true)
}

/// Connect the application pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options =
        PgConnectOptions::from_str(&config.url)?.application_name(APPLICATION_NAME);

    let pool = pool_options(config).connect_with(connect_options).await?;

    info!(
        max = config.max_connections,
        min = config.min_connections,
        "Database pool created"
    );
    Ok(pool)
}

/// Apply the embedded migrations under `backend/migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}

/// Round trip through the pool
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
        warn!(error = %e, "Database health check failed");
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::time::Duration;

    #[test]
    fn test_pool_options_follow_config() {
        let mut config = AppConfig::default().database;
        config.max_connections = 4;
        config.acquire_timeout_secs = 3;

        let options = pool_options(&config);
        assert_eq!(options.get_max_connections(), 4);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(600)));
        assert_eq!(options.get_max_lifetime(), Some(Duration::from_secs(1800)));
    }

    #[test]
    fn test_min_connections_capped_by_max() {
        let mut config = AppConfig::default().database;
        config.max_connections = 2;
        config.min_connections = 8;

        assert_eq!(pool_options(&config).get_min_connections(), 2);
    }

    #[tokio::test]
    async fn test_create_pool_rejects_malformed_url() {
        let mut config = AppConfig::default().database;
        config.url = "not a database url".to_string();
        assert!(create_pool(&config).await.is_err());
    }
}
