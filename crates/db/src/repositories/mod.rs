//! Repository functions for data access.
//!
//! Every function is generic over [`sea_orm::ConnectionTrait`] so the same
//! query runs against a pooled connection or inside an open database
//! transaction. `*_for_update` variants take a row lock on backends that
//! support one.
//!
//! SQLite has no row locks and opens transactions deferred: a transaction
//! that reads first and writes later fails with `SQLITE_BUSY` if another
//! writer got in between. On SQLite the `*_for_update` variants therefore
//! start with a no-op write on the row, taking the database write lock
//! before anything is read so concurrent writers wait on the busy timeout.

pub mod accounts;
pub mod balance_changes;
pub mod invoices;
pub mod transactions;

use sea_orm::{ConnectionTrait, DbBackend};

/// True when `*_for_update` must claim the write lock with a no-op write.
fn needs_write_claim<C: ConnectionTrait>(conn: &C) -> bool {
    conn.get_database_backend() == DbBackend::Sqlite
}
