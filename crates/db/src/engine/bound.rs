//! Externally-driven mode: runs inside a transaction the caller owns.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;
use tracing::warn;
use vault_core::ledger::{Transfer, TransferError};
use vault_shared::types::{AccountId, InvoiceId, TransactionId};

use super::ops;

/// Transfer bound to a caller's open database transaction.
///
/// The caller decides whether to commit or roll back, usually after
/// combining the transfer with its own writes. Each instance serves a
/// single call; any later call fails with
/// [`TransferError::TransferAlreadyUsed`] before reaching the database,
/// whether the first call succeeded or not.
#[derive(Debug)]
pub struct BoundTransfer<'txn> {
    txn: &'txn DatabaseTransaction,
    used: AtomicBool,
}

impl<'txn> BoundTransfer<'txn> {
    /// Binds a fresh, unused transfer to `txn`.
    #[must_use]
    pub const fn new(txn: &'txn DatabaseTransaction) -> Self {
        Self {
            txn,
            used: AtomicBool::new(false),
        }
    }

    /// Returns true once a call has been made.
    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Acquire)
    }

    fn claim(&self) -> Result<(), TransferError> {
        if self.used.swap(true, Ordering::AcqRel) {
            warn!("Bound transfer called more than once");
            return Err(TransferError::TransferAlreadyUsed);
        }
        Ok(())
    }
}

#[async_trait]
impl Transfer for BoundTransfer<'_> {
    async fn hold(
        &self,
        invoice_id: InvoiceId,
        source: Option<AccountId>,
    ) -> Result<TransactionId, TransferError> {
        self.claim()?;
        ops::hold(self.txn, invoice_id, source).await
    }

    async fn accept(&self, transaction_id: TransactionId) -> Result<(), TransferError> {
        self.claim()?;
        ops::accept(self.txn, transaction_id).await
    }

    async fn reject(&self, transaction_id: TransactionId) -> Result<(), TransferError> {
        self.claim()?;
        ops::reject(self.txn, transaction_id).await
    }
}
