//! Account seeding and inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # Seed a staff account
//! moto-shop account create -u quanly01 -r MANAGER
//!
//! # Show which role the backend will resolve for an account
//! moto-shop account role quanly01
//! ```

use moto_shop_core::{Role, RoleParseError, Username, UsernameError};
use moto_shop_server::db::{AccountLookup, AccountRepository, RepositoryError};
use moto_shop_server::models::Account;
use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Missing environment variable: SHOP_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    InvalidRole(#[from] RoleParseError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("No account with username: {0}")]
    NotFound(String),
}

/// Create a new account with the given role code.
///
/// # Errors
///
/// Returns `AccountError` if the username or role is invalid, the username
/// is taken, or the database is unreachable.
pub async fn create(username: &str, role: &str) -> Result<Account, AccountError> {
    let username = Username::parse(username)?;
    let role: Role = role.parse()?;

    let pool = super::connect()
        .await
        .ok_or(AccountError::MissingDatabaseUrl)??;

    tracing::info!("Creating account: {} ({})", username, role);
    let account = AccountRepository::new(&pool)
        .create(&username, role)
        .await?;

    tracing::info!(
        "Account created successfully! ID: {}, Username: {}, Role: {}",
        account.id,
        account.username,
        account.role()
    );

    Ok(account)
}

/// Resolve the role the backend assigns to `username`'s account.
///
/// # Errors
///
/// Returns `AccountError::NotFound` if there is no such account, or a
/// database error.
pub async fn role(username: &str) -> Result<Role, AccountError> {
    let pool = super::connect()
        .await
        .ok_or(AccountError::MissingDatabaseUrl)??;

    let account = AccountRepository::new(&pool)
        .find_by_username(username)
        .await?
        .ok_or_else(|| AccountError::NotFound(username.to_owned()))?;

    let role = account.role();
    if Role::try_from_code(&account.role_code).is_none() {
        tracing::warn!(
            "Stored role code '{}' is not a known role; resolved as {}",
            account.role_code,
            role
        );
    }
    tracing::info!("{}: {} (authority {})", account.username, role, role.authority());

    Ok(role)
}
