//! Per-request security context.

use moto_shop_core::Role;

use crate::models::Principal;

/// The identity attached to one request, if any.
///
/// Built from the session by the [`SecurityContext`] extractor in
/// [`crate::middleware::auth`] and passed explicitly to whatever needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    principal: Option<Principal>,
}

impl SecurityContext {
    /// A context with no identity.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { principal: None }
    }

    /// The authenticated principal, or `None` when the request is anonymous
    /// or authentication did not complete.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref().filter(|p| p.authenticated)
    }

    /// Whether an authenticated principal is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }

    /// Username of the authenticated principal.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.principal().map(|p| p.username.as_str())
    }

    /// Whether the authenticated principal holds `role`'s authority.
    ///
    /// Always false for an anonymous context.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.principal()
            .is_some_and(|p| p.has_authority(role.authority()))
    }
}

impl From<Principal> for SecurityContext {
    fn from(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }
}

impl From<Option<Principal>> for SecurityContext {
    fn from(principal: Option<Principal>) -> Self {
        Self { principal }
    }
}
