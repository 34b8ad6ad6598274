//! Application state shared across handlers.

use sqlx::PgPool;

use crate::db::AccountRepository;

/// Application state shared across all handlers.
///
/// Cloning is cheap: `PgPool` is reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Account repository borrowing the shared pool.
    #[must_use]
    pub const fn accounts(&self) -> AccountRepository<'_> {
        AccountRepository::new(&self.pool)
    }
}
