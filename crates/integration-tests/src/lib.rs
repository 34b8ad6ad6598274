//! Integration tests for Moto Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p moto-shop-integration-tests
//! ```
//!
//! No database is needed: account lookups go through the in-memory
//! [`InMemoryAccounts`] and sessions through `tower_sessions::MemoryStore`.
//!
//! # Test Categories
//!
//! - `role_checker` - role resolution and access predicates
//! - `account_access` - account route decisions (403 vs 404)
//! - `http_guards` - session-backed extractors driven through an axum router

use axum::{
    Json, Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
    routing::post,
};
use chrono::Utc;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use moto_shop_core::{AccountId, Role, Username};
use moto_shop_server::db::{AccountLookup, RepositoryError};
use moto_shop_server::middleware::session::SESSION_COOKIE_NAME;
use moto_shop_server::middleware::set_current_principal;
use moto_shop_server::models::{Account, Principal};
use moto_shop_server::security::SecurityContext;

/// Account store backed by a `Vec`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccounts {
    accounts: Vec<Account>,
}

impl InMemoryAccounts {
    /// Add an account with the given raw role code.
    ///
    /// # Panics
    ///
    /// Panics if `username` is not a valid username.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with(mut self, id: i32, username: &str, role_code: &str) -> Self {
        let now = Utc::now();
        self.accounts.push(Account {
            id: AccountId::new(id),
            username: Username::parse(username).expect("valid test username"),
            role_code: role_code.to_owned(),
            created_at: now,
            updated_at: now,
        });
        self
    }

    /// A small shop: one account per role plus one with a retired role code.
    #[must_use]
    pub fn shop() -> Self {
        Self::default()
            .with(1, "admin", "ADMIN")
            .with(2, "quanly", "MANAGER")
            .with(3, "khach", "USER")
            .with(4, "khach2", "USER")
            .with(5, "cu", "SALES")
    }
}

impl AccountLookup for InMemoryAccounts {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.username.as_str() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.iter().find(|a| a.id == id).cloned())
    }
}

/// Account store whose every lookup fails, as if the database were down.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableAccounts;

impl AccountLookup for UnavailableAccounts {
    async fn find_by_username(&self, _: &str) -> Result<Option<Account>, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _: AccountId) -> Result<Option<Account>, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Security context of a principal granted exactly `role`.
#[must_use]
pub fn signed_in(username: &str, role: Role) -> SecurityContext {
    SecurityContext::from(Principal::with_role(username, role))
}

// =============================================================================
// HTTP helpers
// =============================================================================

/// Path of the test-only sign-in endpoint added by [`with_sessions`].
pub const SIGN_IN_PATH: &str = "/test/sign-in";

async fn sign_in(session: Session, Json(principal): Json<Principal>) -> StatusCode {
    match set_current_principal(&session, &principal).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Add a sign-in endpoint and an in-memory session layer to `router`.
///
/// The layer uses the production cookie name so tests can forge cookies the
/// session manager will actually parse.
pub fn with_sessions(router: Router) -> Router {
    router.route(SIGN_IN_PATH, post(sign_in)).layer(
        SessionManagerLayer::new(MemoryStore::default())
            .with_name(SESSION_COOKIE_NAME)
            .with_secure(false),
    )
}

/// Send one request through `app`.
///
/// # Panics
///
/// Panics if the request cannot be built or the router errors.
#[allow(clippy::expect_used)]
pub async fn send(app: &Router, method: &str, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).expect("valid request"))
        .await
        .expect("router is infallible")
}

/// Sign `principal` in and return the session cookie (`name=value`).
///
/// # Panics
///
/// Panics if sign-in does not succeed or no cookie is issued.
#[allow(clippy::expect_used)]
pub async fn sign_in_as(app: &Router, principal: &Principal) -> String {
    let body = serde_json::to_vec(principal).expect("principal serializes");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(SIGN_IN_PATH)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .expect("valid request"),
        )
        .await
        .expect("router is infallible");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie issued");
    set_cookie
        .split(';')
        .next()
        .expect("cookie has a name=value pair")
        .to_owned()
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
#[allow(clippy::expect_used)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}
