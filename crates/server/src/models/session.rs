//! Session-related types.
//!
//! The authentication layer stores a [`Principal`] in the session after a
//! successful sign-in. Everything downstream only reads it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use moto_shop_core::Role;

/// Session-stored identity of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Username the identity was authenticated as.
    pub username: String,
    /// Granted authority strings, e.g. `ROLE_ADMIN`.
    pub authorities: BTreeSet<String>,
    /// Whether authentication completed. An unauthenticated principal is
    /// treated like no principal at all.
    pub authenticated: bool,
}

impl Principal {
    /// An authenticated principal with the given authorities.
    pub fn new<I, A>(username: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            username: username.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
            authenticated: true,
        }
    }

    /// An authenticated principal granted exactly `role`'s authority.
    pub fn with_role(username: impl Into<String>, role: Role) -> Self {
        Self::new(username, [role.authority()])
    }

    /// Whether `authority` is granted, compared exactly.
    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current authenticated principal.
    pub const PRINCIPAL: &str = "principal";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_role_grants_single_authority() {
        let principal = Principal::with_role("hoa", Role::Manager);
        assert!(principal.authenticated);
        assert!(principal.has_authority("ROLE_MANAGER"));
        assert_eq!(principal.authorities.len(), 1);
    }

    #[test]
    fn test_has_authority_is_exact() {
        let principal = Principal::new("hoa", ["ROLE_ADMIN"]);
        assert!(principal.has_authority("ROLE_ADMIN"));
        assert!(!principal.has_authority("role_admin"));
        assert!(!principal.has_authority("ADMIN"));
        assert!(!principal.has_authority("ROLE_ADMIN "));
    }
}
