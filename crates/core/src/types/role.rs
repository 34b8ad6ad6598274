//! Account roles.
//!
//! A role has two string forms:
//! - the *code* stored on an account row (`"ADMIN"`)
//! - the *authority* granted to an authenticated principal (`"ROLE_ADMIN"`)
//!
//! Both are compared by exact equality. There is no hierarchy between roles;
//! an admin is not implicitly a manager.

use serde::{Deserialize, Serialize};

/// Error returned when strictly parsing a role code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0} (expected one of GUEST, USER, MANAGER, ADMIN)")]
pub struct RoleParseError(pub String);

/// Coarse-grained access role of a shop account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Not signed in.
    Guest,
    /// Regular customer.
    User,
    /// Shop staff with access to every customer's resources.
    Manager,
    /// Full access.
    Admin,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 4] = [Self::Guest, Self::User, Self::Manager, Self::Admin];

    /// Role assumed for an account whose stored code is unknown, or for an
    /// authenticated principal that has no account row.
    pub const FALLBACK: Self = Self::User;

    /// The code persisted in the `role` column of an account.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Guest => "GUEST",
            Self::User => "USER",
            Self::Manager => "MANAGER",
            Self::Admin => "ADMIN",
        }
    }

    /// The granted-authority string carried by a principal holding this role.
    #[must_use]
    pub const fn authority(self) -> &'static str {
        match self {
            Self::Guest => "ROLE_GUEST",
            Self::User => "ROLE_USER",
            Self::Manager => "ROLE_MANAGER",
            Self::Admin => "ROLE_ADMIN",
        }
    }

    /// Look up a role by its exact stored code.
    #[must_use]
    pub fn try_from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    /// Map a stored code to a role, falling back to [`Role::FALLBACK`] for
    /// codes that do not name a known role.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self::try_from_code(code).unwrap_or(Self::FALLBACK)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_code(s).ok_or_else(|| RoleParseError(s.to_owned()))
    }
}
