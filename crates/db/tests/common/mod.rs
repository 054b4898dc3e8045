//! Shared fixtures for database integration tests.
//!
//! Most tests get their own in-memory SQLite database. The pool is pinned to
//! a single connection so the database lives as long as the pool does;
//! never query through such a pool while a transaction from it is open.
//! Concurrency tests use [`setup_file_backed`] instead, where several
//! connections really do write at the same time.

#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;
use serde_json::json;
use vault_core::ledger::{Account, Invoice, NewAccount, NewInvoice};
use vault_db::migration::{Migrator, MigratorTrait};
use vault_db::repositories::{accounts, balance_changes, invoices, transactions};
use vault_shared::types::{AccountId, InvoiceId, Money, TransactionId};

pub async fn setup() -> DatabaseConnection {
    let db = connect_empty().await;
    Migrator::up(&db, None).await.expect("migrations should apply");
    db
}

/// A migrated database file shared by a pool of `connections`.
///
/// The file lives in the returned directory; keep it alive for the test.
pub async fn setup_file_backed(connections: u32) -> (DatabaseConnection, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("ledger.db").display()
    );
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(connections)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("sqlite file should open");
    Migrator::up(&db, None).await.expect("migrations should apply");
    (db, dir)
}

/// A database with no schema, for store failure tests.
pub async fn connect_empty() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(options)
        .await
        .expect("in-memory sqlite should open")
}

pub async fn open_account(db: &DatabaseConnection, key: &str, balance: i64) -> Account {
    open_account_in(db, key, "USD", balance).await
}

pub async fn open_account_in(
    db: &DatabaseConnection,
    key: &str,
    currency: &str,
    balance: i64,
) -> Account {
    accounts::insert(
        db,
        NewAccount {
            currency: currency.to_string(),
            external_key: key.to_string(),
            opening_balance: Money::new(balance),
            metadata: json!({}),
        },
    )
    .await
    .expect("account insert should succeed")
}

pub async fn issue_invoice(db: &DatabaseConnection, total: i64, destination: AccountId) -> Invoice {
    invoices::insert(
        db,
        NewInvoice {
            external_key: format!("order-{}", InvoiceId::new()),
            strategy: "checkout".to_string(),
            total: Money::new(total),
            payload: json!({ "items": 1 }),
            destination_account_id: destination,
        },
    )
    .await
    .expect("invoice insert should succeed")
}

pub async fn balance(db: &DatabaseConnection, id: AccountId) -> i64 {
    accounts::find_by_id(db, id)
        .await
        .expect("query should succeed")
        .expect("account should exist")
        .balance
        .minor()
}

pub async fn invoice(db: &DatabaseConnection, id: InvoiceId) -> Invoice {
    invoices::find_by_id(db, id)
        .await
        .expect("query should succeed")
        .expect("invoice should exist")
}

pub async fn transaction(
    db: &DatabaseConnection,
    id: TransactionId,
) -> vault_core::ledger::Transaction {
    transactions::find_by_id(db, id)
        .await
        .expect("query should succeed")
        .expect("transaction should exist")
}

pub async fn journal_len(db: &DatabaseConnection, id: AccountId) -> usize {
    balance_changes::list_for_account(db, id)
        .await
        .expect("query should succeed")
        .len()
}
