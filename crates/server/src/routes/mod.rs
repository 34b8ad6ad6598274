//! HTTP route handlers for the shop backend.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database ping)
//!
//! # Current identity
//! GET  /api/me                          - Username and resolved role (works anonymously)
//!
//! # Accounts (owner, ADMIN or MANAGER)
//! GET  /api/accounts/{id}               - Account by ID
//! GET  /api/accounts/by-username/{name} - Account by username
//!
//! # Staff (ADMIN or MANAGER)
//! GET  /api/admin/accounts              - All accounts
//! ```

pub mod accounts;
pub mod health;
pub mod me;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me::show))
        .route("/accounts/{id}", get(accounts::show))
        .route("/accounts/by-username/{username}", get(accounts::show_by_username))
        .route("/admin/accounts", get(accounts::list))
}

/// Create the full application router (without session and tracing layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
}
