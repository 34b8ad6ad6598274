//! Authentication extractors and role guards.
//!
//! The identity comes from the session (see [`set_current_principal`]).
//! Guards only inspect the principal's granted authorities; they never hit
//! the database.

use std::convert::Infallible;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use moto_shop_core::Role;
use serde_json::json;
use tower_sessions::Session;

use crate::models::{Principal, session_keys};
use crate::security::SecurityContext;

/// Error returned when a guard rejects the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Signed in, but without the required role (for HTML requests).
    Forbidden,
    /// Signed in, but without the required role (for API requests).
    ApiForbidden,
}

const FORBIDDEN_MESSAGE: &str = "You do not have permission to access this resource";

fn is_api_path(parts: &Parts) -> bool {
    parts.uri.path().starts_with("/api/")
}

impl IntoResponse for AccessRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE).into_response(),
            Self::ApiForbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": format!("Forbidden: {FORBIDDEN_MESSAGE}") })),
            )
                .into_response(),
        }
    }
}

/// Reads the principal from the session, if the session layer is installed.
async fn load_principal(parts: &Parts) -> Option<Principal> {
    let session = parts.extensions.get::<Session>()?;
    match session.get::<Principal>(session_keys::PRINCIPAL).await {
        Ok(principal) => principal,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read principal from session");
            None
        }
    }
}

/// Context for an authenticated request, or the rejection matching the path.
async fn authenticated_context(parts: &Parts) -> Result<SecurityContext, AccessRejection> {
    let context = SecurityContext::from(load_principal(parts).await);
    if context.is_authenticated() {
        return Ok(context);
    }

    if is_api_path(parts) {
        Err(AccessRejection::Unauthorized)
    } else {
        Err(AccessRejection::RedirectToLogin)
    }
}

/// Authenticated context holding at least one of `roles`, else `Forbidden`.
async fn context_with_any_role(
    parts: &Parts,
    roles: &[Role],
) -> Result<SecurityContext, AccessRejection> {
    let context = authenticated_context(parts).await?;
    if roles.iter().any(|role| context.has_role(*role)) {
        return Ok(context);
    }

    tracing::debug!(
        username = context.username().unwrap_or_default(),
        path = parts.uri.path(),
        ?roles,
        "role guard rejected request"
    );
    if is_api_path(parts) {
        Err(AccessRejection::ApiForbidden)
    } else {
        Err(AccessRejection::Forbidden)
    }
}

/// Extracts the (possibly anonymous) security context. Never rejects.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(context: SecurityContext) -> impl IntoResponse {
///     match context.username() {
///         Some(name) => format!("Xin chào, {name}!"),
///         None => "Xin chào!".to_string(),
///     }
/// }
/// ```
impl<S> FromRequestParts<S> for SecurityContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from(load_principal(parts).await))
    }
}

/// Extractor that requires an authenticated identity.
///
/// Anonymous requests get 401 under `/api/` and a redirect to the login
/// page elsewhere.
pub struct RequireAuth(pub SecurityContext);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AccessRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authenticated_context(parts).await.map(Self)
    }
}

/// Extractor that requires the `ROLE_ADMIN` authority.
pub struct RequireAdmin(pub SecurityContext);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AccessRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context_with_any_role(parts, &[Role::Admin])
            .await
            .map(Self)
    }
}

/// Extractor that requires the `ROLE_ADMIN` or `ROLE_MANAGER` authority.
pub struct RequireAdminOrManager(pub SecurityContext);

impl<S> FromRequestParts<S> for RequireAdminOrManager
where
    S: Send + Sync,
{
    type Rejection = AccessRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context_with_any_role(parts, &[Role::Admin, Role::Manager])
            .await
            .map(Self)
    }
}

/// Store the signed-in principal in the session.
///
/// Called by the sign-in flow once authentication has succeeded.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_principal(
    session: &Session,
    principal: &Principal,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::PRINCIPAL, principal).await
}

/// Remove the principal from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_principal(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<Principal>(session_keys::PRINCIPAL)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Request, header};

    use super::*;

    fn parts(path: &str) -> Parts {
        Request::builder()
            .uri(path)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AccessRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AccessRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );

        let api = AccessRejection::ApiForbidden.into_response();
        assert_eq!(api.status(), StatusCode::FORBIDDEN);
        assert_eq!(api.headers()[header::CONTENT_TYPE], "application/json");

        let redirect = AccessRejection::RedirectToLogin.into_response();
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
        assert_eq!(redirect.headers()[header::LOCATION], "/auth/login");
    }

    #[tokio::test]
    async fn test_missing_session_layer_is_anonymous() {
        let mut parts = parts("/api/me");
        let context = SecurityContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(!context.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejection_depends_on_path() {
        let mut api = parts("/api/accounts/1");
        assert_eq!(
            RequireAuth::from_request_parts(&mut api, &()).await.err(),
            Some(AccessRejection::Unauthorized)
        );

        let mut page = parts("/account");
        assert_eq!(
            RequireAdmin::from_request_parts(&mut page, &()).await.err(),
            Some(AccessRejection::RedirectToLogin)
        );
    }
}
