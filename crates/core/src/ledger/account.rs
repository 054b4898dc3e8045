//! Funded account and the single rule for mutating its balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_shared::types::{AccountId, Money};

use super::balance_change::ChangeKind;
use super::error::TransferError;

/// An account holding funds in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Currency code of the balance.
    pub currency: String,
    /// Caller-supplied key (customer id, merchant id, ...).
    pub external_key: String,
    /// Balance in minor units.
    pub balance: Money,
    /// Arbitrary metadata.
    pub metadata: serde_json::Value,
    /// When the account was opened.
    pub created_at: DateTime<Utc>,
    /// When the balance last changed.
    pub updated_at: DateTime<Utc>,
}

/// Result of applying one change to an account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Account that was changed.
    pub account_id: AccountId,
    /// What produced the change.
    pub kind: ChangeKind,
    /// Signed delta applied to the balance.
    pub amount: Money,
    /// Balance after the change.
    pub balance_after: Money,
}

impl Account {
    /// Applies `amount` to the balance according to `kind`.
    ///
    /// Holds debit, completions and refunds credit. A hold that would leave
    /// the balance negative fails with `InsufficientFunds` and the account
    /// is left untouched.
    pub fn post(&mut self, kind: ChangeKind, amount: Money) -> Result<Posting, TransferError> {
        if !amount.is_positive() {
            return Err(TransferError::InvalidAmount(amount));
        }

        let delta = if kind.is_debit() {
            amount
                .checked_neg()
                .ok_or(TransferError::AmountOverflow(self.id))?
        } else {
            amount
        };

        let balance_after = self
            .balance
            .checked_add(delta)
            .ok_or(TransferError::AmountOverflow(self.id))?;

        if kind.is_debit() && balance_after.is_negative() {
            return Err(TransferError::InsufficientFunds {
                account_id: self.id,
                balance: self.balance,
                requested: amount,
            });
        }

        self.balance = balance_after;

        Ok(Posting {
            account_id: self.id,
            kind,
            amount: delta,
            balance_after,
        })
    }

    /// Returns true if a hold of `amount` would succeed.
    #[must_use]
    pub fn covers(&self, amount: Money) -> bool {
        self.balance
            .checked_sub(amount)
            .is_some_and(|after| !after.is_negative())
    }
}

/// Input for opening an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Currency code.
    pub currency: String,
    /// Caller-supplied key.
    pub external_key: String,
    /// Starting balance, in minor units.
    pub opening_balance: Money,
    /// Arbitrary metadata.
    pub metadata: serde_json::Value,
}

impl NewAccount {
    /// Validates the input. The opening balance may not be negative.
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.opening_balance.is_negative() {
            return Err(TransferError::InvalidAmount(self.opening_balance));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn account_with_balance(balance: i64) -> Account {
    let now = Utc::now();
    Account {
        id: AccountId::new(),
        currency: "USD".to_string(),
        external_key: format!("acct-{balance}"),
        balance: Money::new(balance),
        metadata: serde_json::Value::Null,
        created_at: now,
        updated_at: now,
    }
}
