//! The transfer contract.
//!
//! Callers (a checkout flow, a batch job, an RPC handler) move funds only
//! through [`Transfer`]. The database layer provides two implementations:
//! one that owns a unit of work per call, and one bound to a unit of work
//! supplied and committed by the caller.

use async_trait::async_trait;
use vault_shared::types::{AccountId, InvoiceId, Money, TransactionId};

use super::error::TransferError;

/// Two-phase funds movement: hold, then accept or reject.
#[async_trait]
pub trait Transfer: Send + Sync {
    /// Debits the invoice total from `source` and opens a transaction in
    /// `Authorization`.
    ///
    /// When `source` is `None` the account already bound to the invoice is
    /// used.
    async fn hold(
        &self,
        invoice_id: InvoiceId,
        source: Option<AccountId>,
    ) -> Result<TransactionId, TransferError>;

    /// Settles a held transaction into its destination and marks the
    /// invoice paid.
    async fn accept(&self, transaction_id: TransactionId) -> Result<(), TransferError>;

    /// Reverses a held transaction back into its source.
    async fn reject(&self, transaction_id: TransactionId) -> Result<(), TransferError>;
}

/// Read-only pre-validation of a transfer.
#[async_trait]
pub trait Cashier: Send + Sync {
    /// Returns `Ok` if moving `amount` from `source` to `destination` is
    /// currently allowed. Never mutates anything.
    async fn can_transfer(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: Money,
    ) -> Result<(), TransferError>;
}
