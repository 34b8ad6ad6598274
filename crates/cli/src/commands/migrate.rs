//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! moto-shop migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/server/migrations/`: the `shop.account` table and the
//! `tower_sessions.session` table used by the session store.

use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: SHOP_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending shop migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let pool = super::connect()
        .await
        .ok_or(MigrationError::MissingDatabaseUrl)??;

    tracing::info!("Running shop migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Shop migrations complete!");
    Ok(())
}
