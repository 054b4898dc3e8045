//! Two-phase funds movement.
//!
//! This module implements the ledger domain:
//! - Accounts and the balance posting rule
//! - Invoices and their settlement lifecycle
//! - Hold transactions and their state machine
//! - Balance change entries and audit trail replay
//! - Pre-transfer policy checks
//! - The `Transfer` and `Cashier` contracts
//! - Error types for transfer operations

pub mod account;
pub mod audit;
pub mod balance_change;
pub mod contract;
pub mod error;
pub mod invoice;
pub mod policy;
pub mod transaction;

#[cfg(test)]
mod posting_props;

pub use account::{Account, NewAccount, Posting};
pub use audit::{AuditError, replay};
pub use balance_change::{BalanceChange, ChangeKind};
pub use contract::{Cashier, Transfer};
pub use error::{StoreError, TransferError};
pub use invoice::{Invoice, InvoiceStatus, NewInvoice};
pub use policy::TransferPolicy;
pub use transaction::{Settlement, Transaction, TransactionStatus};
