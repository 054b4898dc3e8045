//! Read-only transfer pre-validation against stored accounts.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};
use vault_core::ledger::{Cashier, TransferError, TransferPolicy};
use vault_shared::config::TransferConfig;
use vault_shared::types::{AccountId, Money};

use crate::repositories::accounts;

/// [`Cashier`] that checks a prospective transfer against current balances
/// and the configured policy. Never writes.
#[derive(Debug, Clone)]
pub struct AccountCashier {
    db: DatabaseConnection,
    policy: TransferPolicy,
}

impl AccountCashier {
    /// Creates a cashier with an explicit policy.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: TransferPolicy) -> Self {
        Self { db, policy }
    }

    /// Creates a cashier from the `transfer` config section.
    #[must_use]
    pub fn from_config(db: DatabaseConnection, config: &TransferConfig) -> Self {
        Self::new(db, TransferPolicy::new(config.max_amount.map(Money::new)))
    }
}

#[async_trait]
impl Cashier for AccountCashier {
    #[instrument(skip_all, fields(source = %source, destination = %destination, amount = %amount))]
    async fn can_transfer(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: Money,
    ) -> Result<(), TransferError> {
        if !amount.is_positive() {
            return Err(TransferError::InvalidAmount(amount));
        }
        if source == destination {
            return Err(TransferError::SameAccount(source));
        }

        let source_account = accounts::find_by_id(&self.db, source)
            .await
            .map_err(TransferError::store)?
            .ok_or(TransferError::AccountNotFound(source))?;
        let destination_account = accounts::find_by_id(&self.db, destination)
            .await
            .map_err(TransferError::store)?
            .ok_or(TransferError::AccountNotFound(destination))?;

        self.policy
            .check(&source_account, &destination_account, amount)
            .inspect_err(|err| debug!(error = %err, "Transfer not allowed"))
    }
}
