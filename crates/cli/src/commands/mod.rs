//! CLI command implementations.

pub mod account;
pub mod migrate;

use secrecy::SecretString;
use sqlx::PgPool;

/// Connect to the shop database named by `SHOP_DATABASE_URL` (or `DATABASE_URL`).
///
/// Returns `None` when neither variable is set.
async fn connect() -> Option<Result<PgPool, sqlx::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()?;

    tracing::info!("Connecting to shop database...");
    Some(moto_shop_server::db::create_pool(&SecretString::from(database_url), 2).await)
}
