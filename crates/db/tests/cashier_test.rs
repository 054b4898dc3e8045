//! Account-backed cashier pre-validation.

mod common;

use common::{balance, open_account, open_account_in, setup};
use rstest::rstest;
use vault_core::ledger::{Cashier, TransferError, TransferPolicy};
use vault_db::AccountCashier;
use vault_shared::config::TransferConfig;
use vault_shared::types::{AccountId, Money};

#[tokio::test]
async fn test_allows_covered_transfer() {
    let db = setup().await;
    let a = open_account(&db, "merchant-a", 1000).await;
    let b = open_account(&db, "customer-b", 100).await;
    let cashier = AccountCashier::new(db.clone(), TransferPolicy::default());

    cashier.can_transfer(b.id, a.id, Money::new(100)).await.unwrap();

    // Read only.
    assert_eq!(balance(&db, b.id).await, 100);
}

#[tokio::test]
async fn test_refuses_uncovered_transfer() {
    let db = setup().await;
    let a = open_account(&db, "merchant-a", 1000).await;
    let c = open_account(&db, "customer-c", 10).await;
    let cashier = AccountCashier::new(db.clone(), TransferPolicy::default());

    let err = cashier
        .can_transfer(c.id, a.id, Money::new(100))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TransferError::InsufficientFunds { account_id, .. } if account_id == c.id
    ));
}

#[rstest]
#[case::zero(0)]
#[case::negative(-5)]
#[tokio::test]
async fn test_refuses_non_positive_amount(#[case] amount: i64) {
    let db = setup().await;
    let a = open_account(&db, "merchant-a", 1000).await;
    let b = open_account(&db, "customer-b", 100).await;
    let cashier = AccountCashier::new(db, TransferPolicy::default());

    assert!(matches!(
        cashier.can_transfer(b.id, a.id, Money::new(amount)).await,
        Err(TransferError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn test_refuses_unknown_accounts() {
    let db = setup().await;
    let a = open_account(&db, "merchant-a", 1000).await;
    let cashier = AccountCashier::new(db, TransferPolicy::default());
    let ghost = AccountId::new();

    assert!(matches!(
        cashier.can_transfer(ghost, a.id, Money::new(1)).await,
        Err(TransferError::AccountNotFound(id)) if id == ghost
    ));
    assert!(matches!(
        cashier.can_transfer(a.id, ghost, Money::new(1)).await,
        Err(TransferError::AccountNotFound(id)) if id == ghost
    ));
}

#[tokio::test]
async fn test_refuses_same_account_and_currency_mismatch() {
    let db = setup().await;
    let usd = open_account(&db, "usd", 1000).await;
    let eur = open_account_in(&db, "eur", "EUR", 1000).await;
    let cashier = AccountCashier::new(db, TransferPolicy::default());

    assert!(matches!(
        cashier.can_transfer(usd.id, usd.id, Money::new(1)).await,
        Err(TransferError::SameAccount(_))
    ));
    assert!(matches!(
        cashier.can_transfer(usd.id, eur.id, Money::new(1)).await,
        Err(TransferError::CurrencyMismatch { .. })
    ));
}

#[tokio::test]
async fn test_configured_limit() {
    let db = setup().await;
    let a = open_account(&db, "merchant-a", 0).await;
    let b = open_account(&db, "customer-b", 10_000).await;
    let cashier = AccountCashier::from_config(
        db,
        &TransferConfig {
            max_amount: Some(500),
        },
    );

    cashier.can_transfer(b.id, a.id, Money::new(500)).await.unwrap();
    assert!(matches!(
        cashier.can_transfer(b.id, a.id, Money::new(501)).await,
        Err(TransferError::LimitExceeded { .. })
    ));
}
