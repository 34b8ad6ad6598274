//! Integration tests for account route decisions.
//!
//! The account handlers delegate to `load_accessible_by_id` /
//! `load_accessible_by_username` and `me::describe`; these tests exercise
//! them against an in-memory store.

use moto_shop_core::{AccountId, Role};
use moto_shop_integration_tests::{InMemoryAccounts, UnavailableAccounts, signed_in};
use moto_shop_server::error::AppError;
use moto_shop_server::routes::accounts::{load_accessible_by_id, load_accessible_by_username};
use moto_shop_server::routes::me::{MeResponse, describe};
use moto_shop_server::security::{RoleChecker, SecurityContext};

// =============================================================================
// By ID
// =============================================================================

#[tokio::test]
async fn test_customer_reads_own_account_by_id() {
    let accounts = InMemoryAccounts::shop();
    let context = signed_in("khach", Role::User);
    let checker = RoleChecker::new(&context, &accounts);

    let account = load_accessible_by_id(&checker, &accounts, AccountId::new(3)).await;
    assert!(matches!(account, Ok(a) if a.username.as_str() == "khach"));
}

#[tokio::test]
async fn test_customer_cannot_read_other_account_by_id() {
    let accounts = InMemoryAccounts::shop();
    let context = signed_in("khach", Role::User);
    let checker = RoleChecker::new(&context, &accounts);

    let result = load_accessible_by_id(&checker, &accounts, AccountId::new(4)).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_unknown_id_is_forbidden_for_customers_and_missing_for_staff() {
    let accounts = InMemoryAccounts::shop();

    let context = signed_in("khach", Role::User);
    let checker = RoleChecker::new(&context, &accounts);
    let result = load_accessible_by_id(&checker, &accounts, AccountId::new(404)).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let context = signed_in("quanly", Role::Manager);
    let checker = RoleChecker::new(&context, &accounts);
    let result = load_accessible_by_id(&checker, &accounts, AccountId::new(404)).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_staff_reads_any_account_by_id() {
    let accounts = InMemoryAccounts::shop();

    for role in [Role::Admin, Role::Manager] {
        let context = signed_in("staff", role);
        let checker = RoleChecker::new(&context, &accounts);
        let result = load_accessible_by_id(&checker, &accounts, AccountId::new(4)).await;
        assert!(matches!(result, Ok(a) if a.id == AccountId::new(4)), "{role}");
    }
}

#[tokio::test]
async fn test_staff_sees_database_error_when_store_is_down() {
    let accounts = UnavailableAccounts;
    let context = signed_in("admin", Role::Admin);
    let checker = RoleChecker::new(&context, &accounts);

    let result = load_accessible_by_id(&checker, &accounts, AccountId::new(1)).await;
    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_customer_sees_database_error_when_store_is_down() {
    let accounts = UnavailableAccounts;
    let context = signed_in("khach", Role::User);
    let checker = RoleChecker::new(&context, &accounts);

    // Reading their own account must not turn an outage into a 403.
    let result = load_accessible_by_id(&checker, &accounts, AccountId::new(3)).await;
    assert!(matches!(result, Err(AppError::Database(_))));
}

// =============================================================================
// By username
// =============================================================================

#[tokio::test]
async fn test_by_username_rules() {
    let accounts = InMemoryAccounts::shop();

    let context = signed_in("khach", Role::User);
    let checker = RoleChecker::new(&context, &accounts);
    assert!(load_accessible_by_username(&checker, &accounts, "khach").await.is_ok());
    assert!(matches!(
        load_accessible_by_username(&checker, &accounts, "khach2").await,
        Err(AppError::Forbidden(_))
    ));

    let context = signed_in("admin", Role::Admin);
    let checker = RoleChecker::new(&context, &accounts);
    assert!(load_accessible_by_username(&checker, &accounts, "khach2").await.is_ok());
    assert!(matches!(
        load_accessible_by_username(&checker, &accounts, "khong_co").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_signed_in_without_account_row() {
    let accounts = InMemoryAccounts::shop();
    let context = signed_in("moi", Role::User);
    let checker = RoleChecker::new(&context, &accounts);

    assert!(matches!(
        load_accessible_by_username(&checker, &accounts, "moi").await,
        Err(AppError::NotFound(_))
    ));
}

// =============================================================================
// /api/me
// =============================================================================

#[tokio::test]
async fn test_describe_anonymous() {
    let accounts = InMemoryAccounts::shop();
    let context = SecurityContext::anonymous();
    let checker = RoleChecker::new(&context, &accounts);

    assert_eq!(
        describe(&checker).await,
        MeResponse {
            authenticated: false,
            username: None,
            role: Role::Guest,
        }
    );
}

#[tokio::test]
async fn test_describe_signed_in() {
    let accounts = InMemoryAccounts::shop();
    let context = signed_in("quanly", Role::Manager);
    let checker = RoleChecker::new(&context, &accounts);

    assert_eq!(
        describe(&checker).await,
        MeResponse {
            authenticated: true,
            username: Some("quanly".to_string()),
            role: Role::Manager,
        }
    );
}

#[tokio::test]
async fn test_describe_without_account_row_is_user() {
    let accounts = InMemoryAccounts::shop();
    let context = signed_in("moi", Role::Admin);
    let checker = RoleChecker::new(&context, &accounts);

    assert_eq!(describe(&checker).await.role, Role::User);
}
