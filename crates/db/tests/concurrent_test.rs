//! Concurrent holds against one source account.
//!
//! These run on a file-backed database with a pool of several connections
//! and a multi-threaded runtime, so holds really overlap. Holds on the same
//! account must serialize on its balance: every covered hold succeeds, the
//! rest fail with `InsufficientFunds`, and the balance never goes negative.

mod common;

use std::collections::BTreeSet;

use common::{balance, issue_invoice, open_account, setup_file_backed};
use futures::future::join_all;
use vault_core::ledger::{Transfer, TransferError};
use vault_db::TransferEngine;
use vault_db::repositories::{accounts, balance_changes};
use vault_shared::types::{AccountId, InvoiceId, TransactionId};

const POOL_SIZE: u32 = 8;

async fn hold_all(
    engine: &TransferEngine,
    invoice_ids: &[InvoiceId],
    source: AccountId,
) -> Vec<Result<TransactionId, TransferError>> {
    let handles = invoice_ids.iter().map(|&invoice_id| {
        let engine = engine.clone();
        tokio::spawn(async move { engine.hold(invoice_id, Some(source)).await })
    });
    join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("hold task should not panic"))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_covered_holds_all_succeed() {
    let (db, _dir) = setup_file_backed(POOL_SIZE).await;
    let merchant = open_account(&db, "merchant", 0).await;
    let customer = open_account(&db, "customer", 1000).await;

    let mut invoice_ids = Vec::new();
    for _ in 0..10 {
        invoice_ids.push(issue_invoice(&db, 100, merchant.id).await.id);
    }

    let engine = TransferEngine::new(db.clone());
    let results = hold_all(&engine, &invoice_ids, customer.id).await;

    for result in &results {
        assert!(result.is_ok(), "covered hold failed: {result:?}");
    }
    assert_eq!(balance(&db, customer.id).await, 0);

    let snapshots: BTreeSet<i64> = balance_changes::list_for_account(&db, customer.id)
        .await
        .unwrap()
        .iter()
        .map(|change| change.balance.minor())
        .collect();
    let expected: BTreeSet<i64> = (0..10).map(|step| step * 100).collect();
    assert_eq!(snapshots, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_holds_never_overdraw() {
    let (db, _dir) = setup_file_backed(POOL_SIZE).await;
    let merchant = open_account(&db, "merchant", 0).await;
    let customer = open_account(&db, "customer", 1000).await;
    let total_before = accounts::total_balance(&db).await.unwrap();

    let mut invoice_ids = Vec::new();
    for _ in 0..15 {
        invoice_ids.push(issue_invoice(&db, 100, merchant.id).await.id);
    }

    let engine = TransferEngine::new(db.clone());
    let results = hold_all(&engine, &invoice_ids, customer.id).await;

    let held: Vec<TransactionId> = results
        .iter()
        .filter_map(|r| r.as_ref().ok().copied())
        .collect();
    let refused = results
        .iter()
        .filter(|r| matches!(r, Err(TransferError::InsufficientFunds { .. })))
        .count();
    assert_eq!(held.len(), 10);
    assert_eq!(refused, 5);
    assert_eq!(balance(&db, customer.id).await, 0);

    let trail = balance_changes::list_for_account(&db, customer.id)
        .await
        .unwrap();
    assert_eq!(trail.len(), 10);
    assert!(trail.iter().all(|c| !c.balance.is_negative()));

    // Money in flight plus money in accounts is conserved.
    let in_flight = i64::try_from(held.len()).unwrap() * 100;
    assert_eq!(
        accounts::total_balance(&db).await.unwrap().minor() + in_flight,
        total_before.minor()
    );

    for tx_id in held {
        engine.accept(tx_id).await.unwrap();
    }
    assert_eq!(balance(&db, merchant.id).await, 1000);
    assert_eq!(accounts::total_balance(&db).await.unwrap(), total_before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_settlements_of_distinct_holds() {
    let (db, _dir) = setup_file_backed(POOL_SIZE).await;
    let merchant = open_account(&db, "merchant", 0).await;
    let customer = open_account(&db, "customer", 600).await;
    let engine = TransferEngine::new(db.clone());

    let mut holds = Vec::new();
    for _ in 0..6 {
        let inv = issue_invoice(&db, 100, merchant.id).await;
        holds.push(engine.hold(inv.id, Some(customer.id)).await.unwrap());
    }

    let handles = holds.iter().enumerate().map(|(i, &tx_id)| {
        let engine = engine.clone();
        tokio::spawn(async move {
            if i % 2 == 0 {
                engine.accept(tx_id).await
            } else {
                engine.reject(tx_id).await
            }
        })
    });
    let results = join_all(handles).await;

    for result in results {
        let settled = result.expect("settle task should not panic");
        assert!(settled.is_ok(), "settlement failed: {settled:?}");
    }
    assert_eq!(balance(&db, merchant.id).await, 300);
    assert_eq!(balance(&db, customer.id).await, 300);
}
