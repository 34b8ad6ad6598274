//! Account route handlers.
//!
//! A customer may read their own account; admins and managers may read any.

use axum::{
    Json,
    extract::{Path, State},
};

use moto_shop_core::AccountId;

use crate::db::AccountLookup;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdminOrManager, RequireAuth};
use crate::models::{Account, AccountView};
use crate::security::RoleChecker;
use crate::state::AppState;

fn forbidden() -> AppError {
    AppError::Forbidden("You may only access your own account".to_string())
}

/// Load account `id` if the checker's identity may access it.
///
/// The account is read once; a store failure surfaces as `Database`. An ID
/// that does not resolve is `Forbidden` for customers and `NotFound` for
/// admins and managers.
///
/// # Errors
///
/// `Forbidden`, `NotFound`, or `Database` as described above.
pub async fn load_accessible_by_id<L: AccountLookup>(
    checker: &RoleChecker<'_, L>,
    accounts: &L,
    id: AccountId,
) -> Result<Account> {
    let Some(account) = accounts.find_by_id(id).await? else {
        if checker.is_admin_or_manager() {
            return Err(AppError::NotFound(format!("account {id}")));
        }
        return Err(forbidden());
    };

    if !checker.can_access_user_resource(account.username.as_str()) {
        return Err(forbidden());
    }
    Ok(account)
}

/// Load the account named `username` if the checker's identity may access it.
///
/// # Errors
///
/// `Forbidden` when the caller is neither the owner nor privileged,
/// `NotFound` when no such account exists, `Database` on lookup failure.
pub async fn load_accessible_by_username<L: AccountLookup>(
    checker: &RoleChecker<'_, L>,
    accounts: &L,
    username: &str,
) -> Result<Account> {
    if !checker.can_access_user_resource(username) {
        return Err(forbidden());
    }

    accounts
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("account {username}")))
}

/// `GET /api/accounts/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<AccountView>> {
    let accounts = state.accounts();
    let checker = RoleChecker::new(&context, &accounts);
    let account = load_accessible_by_id(&checker, &accounts, AccountId::new(id)).await?;
    Ok(Json(AccountView::from(&account)))
}

/// `GET /api/accounts/by-username/{username}`
pub async fn show_by_username(
    State(state): State<AppState>,
    RequireAuth(context): RequireAuth,
    Path(username): Path<String>,
) -> Result<Json<AccountView>> {
    let accounts = state.accounts();
    let checker = RoleChecker::new(&context, &accounts);
    let account = load_accessible_by_username(&checker, &accounts, &username).await?;
    Ok(Json(AccountView::from(&account)))
}

/// `GET /api/admin/accounts`
pub async fn list(
    State(state): State<AppState>,
    RequireAdminOrManager(_): RequireAdminOrManager,
) -> Result<Json<Vec<AccountView>>> {
    let accounts = state.accounts().list_all().await?;
    Ok(Json(accounts.iter().map(AccountView::from).collect()))
}
