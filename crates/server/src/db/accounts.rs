//! Account repository for database operations.
//!
//! Authorization only needs the two read paths of [`AccountLookup`]. The
//! write path ([`AccountRepository::create`]) exists for operator seeding
//! through the CLI.

use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use moto_shop_core::{AccountId, Role, Username};

use super::RepositoryError;
use crate::models::account::Account;

/// Read-only account lookups used by the authorization layer.
///
/// Implemented by [`AccountRepository`] for `PostgreSQL`; tests provide
/// in-memory implementations.
pub trait AccountLookup: Sync {
    /// Find the account whose username is exactly `username`.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// Find the account with the given ID.
    fn find_by_id(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<Option<Account>, RepositoryError>> + Send;
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` account queries.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i32,
    username: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: AccountId::new(row.id),
            username,
            role_code: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored username is invalid.
    pub async fn list_all(&self) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, username, role, created_at, updated_at
            FROM shop.account
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a new account with the given role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, username: &Username, role: Role) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO shop.account (username, role)
            VALUES ($1, $2)
            RETURNING id, username, role, created_at, updated_at
            ",
        )
        .bind(username)
        .bind(role.code())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }
}

impl AccountLookup for AccountRepository<'_> {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, username, role, created_at, updated_at
            FROM shop.account
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, username, role, created_at, updated_at
            FROM shop.account
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
