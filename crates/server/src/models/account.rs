//! Account domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use moto_shop_core::{AccountId, Role, Username};

/// A shop account (domain type).
///
/// Owned by the account table; the authorization layer only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Login name, compared exactly.
    pub username: Username,
    /// Role code as stored. May name a role that no longer exists.
    pub role_code: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// The account's role, [`Role::FALLBACK`] when the stored code is unknown.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::from_code(&self.role_code)
    }
}

/// Public JSON view of an account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub id: AccountId,
    pub username: Username,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            role: account.role(),
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn account(role_code: &str) -> Account {
        let now = Utc::now();
        Account {
            id: AccountId::new(1),
            username: Username::parse("rider").unwrap(),
            role_code: role_code.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_from_stored_code() {
        assert_eq!(account("MANAGER").role(), Role::Manager);
        assert_eq!(account("STAFF").role(), Role::User);
    }

    #[test]
    fn test_view_serializes_resolved_role() {
        let view = AccountView::from(&account("ADMIN"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["role"], "ADMIN");
        assert_eq!(json["username"], "rider");
        assert_eq!(json["id"], 1);
    }
}
