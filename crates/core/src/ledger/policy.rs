//! Pre-transfer policy checks.
//!
//! Read-only validation a caller may run before placing a hold. The hold
//! itself only enforces the balance rule; limits live here.

use vault_shared::types::Money;

use super::account::Account;
use super::error::TransferError;

/// Limits applied by [`TransferPolicy::check`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferPolicy {
    /// Largest amount a single transfer may move.
    pub max_amount: Option<Money>,
}

impl TransferPolicy {
    /// Creates a policy with an optional per-transfer limit.
    #[must_use]
    pub const fn new(max_amount: Option<Money>) -> Self {
        Self { max_amount }
    }

    /// Validates moving `amount` from `source` to `destination`.
    ///
    /// Checks, in order: positive amount, distinct accounts, matching
    /// currency, the configured limit, and that the source balance covers
    /// the amount.
    pub fn check(
        &self,
        source: &Account,
        destination: &Account,
        amount: Money,
    ) -> Result<(), TransferError> {
        if !amount.is_positive() {
            return Err(TransferError::InvalidAmount(amount));
        }

        if source.id == destination.id {
            return Err(TransferError::SameAccount(source.id));
        }

        if source.currency != destination.currency {
            return Err(TransferError::CurrencyMismatch {
                source_currency: source.currency.clone(),
                destination_currency: destination.currency.clone(),
            });
        }

        if let Some(limit) = self.max_amount {
            if amount > limit {
                return Err(TransferError::LimitExceeded { amount, limit });
            }
        }

        if !source.covers(amount) {
            return Err(TransferError::InsufficientFunds {
                account_id: source.id,
                balance: source.balance,
                requested: amount,
            });
        }

        Ok(())
    }
}
