//! Self-contained mode: one database transaction per call.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::error;
use vault_core::ledger::{Transfer, TransferError};
use vault_shared::types::{AccountId, InvoiceId, TransactionId};

use super::ops;

/// Transfer engine that opens, commits and rolls back its own unit of work.
#[derive(Debug, Clone)]
pub struct TransferEngine {
    db: DatabaseConnection,
}

impl TransferEngine {
    /// Creates an engine over the given connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn begin(&self) -> Result<DatabaseTransaction, TransferError> {
        self.db.begin().await.map_err(TransferError::store)
    }
}

/// Commits on success. On failure rolls back and returns the original error;
/// a failed rollback is logged, not returned.
async fn finish<T>(
    txn: DatabaseTransaction,
    outcome: Result<T, TransferError>,
) -> Result<T, TransferError> {
    match outcome {
        Ok(value) => {
            txn.commit().await.map_err(TransferError::store)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                error!(error = %rollback_err, cause = %err, "Rollback failed");
            }
            Err(err)
        }
    }
}

#[async_trait]
impl Transfer for TransferEngine {
    async fn hold(
        &self,
        invoice_id: InvoiceId,
        source: Option<AccountId>,
    ) -> Result<TransactionId, TransferError> {
        let txn = self.begin().await?;
        let outcome = ops::hold(&txn, invoice_id, source).await;
        finish(txn, outcome).await
    }

    async fn accept(&self, transaction_id: TransactionId) -> Result<(), TransferError> {
        let txn = self.begin().await?;
        let outcome = ops::accept(&txn, transaction_id).await;
        finish(txn, outcome).await
    }

    async fn reject(&self, transaction_id: TransactionId) -> Result<(), TransferError> {
        let txn = self.begin().await?;
        let outcome = ops::reject(&txn, transaction_id).await;
        finish(txn, outcome).await
    }
}
