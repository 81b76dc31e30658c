use crate::error::DbError;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the MySQL database.
///
/// The connection string is taken from the `DATABASE_URL` environment
/// variable (a local `.env` file is honored if present); pool sizing comes
/// from the caller so it can be driven by `config.toml`. The returned pool
/// is cheap to clone and is shared across the entire application.
pub async fn connect(max_connections: u32, acquire_timeout: Duration) -> Result<MySqlPool, DbError> {
    // Load environment variables from a .env file when one exists.
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(&database_url)
        .await?;

    Ok(pool)
}

/// Applies any pending migrations embedded in this crate.
///
/// Runs at every startup (and from the `migrate` CLI command) so a fresh
/// database and an up-to-date one both end in the same schema.
pub async fn run_migrations(pool: &MySqlPool) -> Result<(), DbError> {
    // The path is relative to this crate's root, resolved at compile time.
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied successfully.");
    Ok(())
}
