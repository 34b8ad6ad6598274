//! Role resolution and access predicates for route handlers.
//!
//! A [`RoleChecker`] pairs the request's [`SecurityContext`] with an
//! [`AccountLookup`]. Its predicates never fail: a missing identity, a
//! missing account row, and a failed lookup all collapse into `false`,
//! [`Role::Guest`]/[`Role::User`], or `None`.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn handler(
//!     State(state): State<AppState>,
//!     context: SecurityContext,
//!     Path(owner): Path<String>,
//! ) -> Result<Json<AccountView>> {
//!     let accounts = AccountRepository::new(state.pool());
//!     let checker = RoleChecker::new(&context, &accounts);
//!     if !checker.can_access_user_resource(&owner) {
//!         return Err(AppError::Forbidden("not your account".into()));
//!     }
//!     // ...
//! }
//! ```

use moto_shop_core::{AccountId, Role};

use super::SecurityContext;
use crate::db::{AccountLookup, RepositoryError};
use crate::models::Account;

/// Access predicates over one request's identity.
pub struct RoleChecker<'a, L> {
    context: &'a SecurityContext,
    accounts: &'a L,
}

impl<'a, L: AccountLookup> RoleChecker<'a, L> {
    /// Create a checker for the given request context.
    #[must_use]
    pub const fn new(context: &'a SecurityContext, accounts: &'a L) -> Self {
        Self { context, accounts }
    }

    /// Whether the current identity holds `role`'s authority.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.context.has_role(role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.has_role(Role::Manager)
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.has_role(Role::User)
    }

    #[must_use]
    pub fn is_admin_or_manager(&self) -> bool {
        self.is_admin() || self.is_manager()
    }

    /// Username of the current identity, `None` when anonymous.
    #[must_use]
    pub fn current_username(&self) -> Option<&'a str> {
        self.context.username()
    }

    /// Role recorded on the current identity's account.
    ///
    /// - anonymous: [`Role::Guest`]
    /// - no account row (or lookup failure): [`Role::User`]
    /// - unknown stored code: [`Role::User`]
    pub async fn current_user_role(&self) -> Role {
        let Some(username) = self.current_username() else {
            return Role::Guest;
        };

        match self.account_by_username(username).await {
            Some(account) => account.role(),
            None => Role::FALLBACK,
        }
    }

    /// The current identity's account, `None` when anonymous or absent.
    pub async fn current_user(&self) -> Option<Account> {
        let username = self.current_username()?;
        self.account_by_username(username).await
    }

    /// Whether the current identity may access resources owned by
    /// `owner_username`: the owner always may, anyone else only as
    /// admin or manager.
    #[must_use]
    pub fn can_access_user_resource(&self, owner_username: &str) -> bool {
        let Some(current) = self.current_username() else {
            return false;
        };

        if current == owner_username {
            return true;
        }

        let allowed = self.is_admin_or_manager();
        if !allowed {
            tracing::debug!(
                username = current,
                owner = owner_username,
                "access to another account's resource denied"
            );
        }
        allowed
    }

    /// Like [`Self::can_access_user_resource`], for an owner given by
    /// account ID. False when the ID does not resolve, whatever the caller's role.
    pub async fn can_access_user_resource_by_id(&self, owner_id: AccountId) -> bool {
        let owner = match self.accounts.find_by_id(owner_id).await {
            Ok(Some(owner)) => owner,
            Ok(None) => return false,
            Err(e) => {
                log_lookup_failure(&e, "id", &owner_id.to_string());
                return false;
            }
        };

        self.can_access_user_resource(owner.username.as_str())
    }

    async fn account_by_username(&self, username: &str) -> Option<Account> {
        match self.accounts.find_by_username(username).await {
            Ok(account) => account,
            Err(e) => {
                log_lookup_failure(&e, "username", username);
                None
            }
        }
    }
}

fn log_lookup_failure(error: &RepositoryError, by: &str, key: &str) {
    tracing::warn!(
        error = %error,
        lookup = by,
        key,
        "account lookup failed, treating account as absent"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use moto_shop_core::Username;

    use super::*;
    use crate::models::Principal;

    struct FakeAccounts(Vec<Account>);

    impl FakeAccounts {
        fn new(rows: &[(i32, &str, &str)]) -> Self {
            let now = Utc::now();
            Self(
                rows.iter()
                    .map(|&(id, username, role)| Account {
                        id: AccountId::new(id),
                        username: Username::parse(username).unwrap(),
                        role_code: role.to_owned(),
                        created_at: now,
                        updated_at: now,
                    })
                    .collect(),
            )
        }
    }

    impl AccountLookup for FakeAccounts {
        async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
            Ok(self.0.iter().find(|a| a.username == *username).cloned())
        }

        async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
            Ok(self.0.iter().find(|a| a.id == id).cloned())
        }
    }

    struct BrokenAccounts;

    impl AccountLookup for BrokenAccounts {
        async fn find_by_username(&self, _: &str) -> Result<Option<Account>, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn find_by_id(&self, _: AccountId) -> Result<Option<Account>, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn shop() -> FakeAccounts {
        FakeAccounts::new(&[
            (1, "admin", "ADMIN"),
            (2, "manager", "MANAGER"),
            (3, "khach", "USER"),
            (4, "legacy", "STAFF"),
        ])
    }

    fn signed_in(username: &str, role: Role) -> SecurityContext {
        SecurityContext::from(Principal::with_role(username, role))
    }

    #[tokio::test]
    async fn test_anonymous_context() {
        let accounts = shop();
        let context = SecurityContext::anonymous();
        let checker = RoleChecker::new(&context, &accounts);

        assert!(!checker.is_admin());
        assert!(!checker.is_user());
        assert!(!checker.can_access_user_resource("khach"));
        assert!(!checker.can_access_user_resource_by_id(AccountId::new(3)).await);
        assert_eq!(checker.current_user_role().await, Role::Guest);
        assert_eq!(checker.current_username(), None);
        assert!(checker.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_role_predicates() {
        let accounts = shop();
        let context = signed_in("manager", Role::Manager);
        let checker = RoleChecker::new(&context, &accounts);

        assert!(checker.is_manager());
        assert!(!checker.is_admin());
        assert!(!checker.is_user());
        assert!(checker.is_admin_or_manager());
    }

    #[tokio::test]
    async fn test_current_user_role_from_account() {
        let accounts = shop();
        // Granted authority and stored role can disagree; the stored one wins here.
        let context = signed_in("admin", Role::User);
        let checker = RoleChecker::new(&context, &accounts);

        assert_eq!(checker.current_user_role().await, Role::Admin);
    }

    #[tokio::test]
    async fn test_current_user_role_fallbacks() {
        let accounts = shop();

        let context = signed_in("ghost", Role::Manager);
        let checker = RoleChecker::new(&context, &accounts);
        assert_eq!(checker.current_user_role().await, Role::User);

        let context = signed_in("legacy", Role::User);
        let checker = RoleChecker::new(&context, &accounts);
        assert_eq!(checker.current_user_role().await, Role::User);
    }

    #[tokio::test]
    async fn test_owner_can_access_own_resource() {
        let accounts = shop();
        let context = signed_in("khach", Role::User);
        let checker = RoleChecker::new(&context, &accounts);

        assert!(checker.can_access_user_resource("khach"));
        assert!(!checker.can_access_user_resource("Khach"));
        assert!(!checker.can_access_user_resource("manager"));
        assert!(checker.can_access_user_resource_by_id(AccountId::new(3)).await);
        assert!(!checker.can_access_user_resource_by_id(AccountId::new(1)).await);
    }

    #[tokio::test]
    async fn test_privileged_can_access_others() {
        let accounts = shop();
        for role in [Role::Admin, Role::Manager] {
            let context = signed_in("staff", role);
            let checker = RoleChecker::new(&context, &accounts);
            assert!(checker.can_access_user_resource("khach"));
            assert!(checker.can_access_user_resource_by_id(AccountId::new(3)).await);
        }
    }

    #[tokio::test]
    async fn test_unknown_id_is_denied_for_everyone() {
        let accounts = shop();
        let context = signed_in("admin", Role::Admin);
        let checker = RoleChecker::new(&context, &accounts);

        assert!(!checker.can_access_user_resource_by_id(AccountId::new(99)).await);
    }

    #[tokio::test]
    async fn test_current_user() {
        let accounts = shop();
        let context = signed_in("khach", Role::User);
        let checker = RoleChecker::new(&context, &accounts);

        let account = checker.current_user().await.unwrap();
        assert_eq!(account.id, AccountId::new(3));
        assert_eq!(checker.current_username(), Some("khach"));
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades() {
        let context = signed_in("admin", Role::Admin);
        let checker = RoleChecker::new(&context, &BrokenAccounts);

        assert_eq!(checker.current_user_role().await, Role::User);
        assert!(checker.current_user().await.is_none());
        assert!(!checker.can_access_user_resource_by_id(AccountId::new(1)).await);
        // The username form never touches the store.
        assert!(checker.can_access_user_resource("anyone"));
    }
}
