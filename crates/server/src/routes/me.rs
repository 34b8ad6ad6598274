//! Current identity endpoint.

use axum::{Json, extract::State};
use serde::Serialize;

use moto_shop_core::Role;

use crate::db::AccountLookup;
use crate::security::{RoleChecker, SecurityContext};
use crate::state::AppState;

/// Response body of `GET /api/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
    pub username: Option<String>,
    pub role: Role,
}

/// Describe the identity behind `checker`.
///
/// Anonymous callers are reported as `GUEST`.
pub async fn describe<L: AccountLookup>(checker: &RoleChecker<'_, L>) -> MeResponse {
    let username = checker.current_username().map(str::to_owned);
    MeResponse {
        authenticated: username.is_some(),
        role: checker.current_user_role().await,
        username,
    }
}

/// `GET /api/me`
pub async fn show(State(state): State<AppState>, context: SecurityContext) -> Json<MeResponse> {
    let accounts = state.accounts();
    let checker = RoleChecker::new(&context, &accounts);
    Json(describe(&checker).await)
}
