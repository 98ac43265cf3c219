//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits and an optional
//! server-side statement timeout.

use std::str::FromStr;
use std::time::Duration;

use campusctl_core::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Name reported to the server in `pg_stat_activity`.
const APPLICATION_NAME: &str = "campusctl";

/// How long to wait for a free connection before giving up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Create a PostgreSQL connection pool, connecting eagerly.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/university", &DatabaseConfig::default()).await?;
/// ```
pub async fn create_pool(database_url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(database_url, config)?;
    pool_options(config).connect_with(options).await
}

/// Create a pool that connects on first use.
///
/// Only the URL is checked here, so input validation can run (and fail)
/// without a reachable server.
pub fn create_lazy_pool(database_url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(database_url, config)?;
    Ok(pool_options(config).connect_lazy_with(options))
}

fn connect_options(database_url: &str, config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let mut options = PgConnectOptions::from_str(database_url)?.application_name(APPLICATION_NAME);

    if let Some(secs) = config.statement_timeout_secs {
        options = options.options([("statement_timeout", format!("{}s", secs))]);
    }
    Ok(options)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    tracing::debug!(
        max_connections = config.max_connections,
        statement_timeout_secs = ?config.statement_timeout_secs,
        "configuring database pool"
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
}
