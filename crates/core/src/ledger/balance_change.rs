//! Balance change ledger entries.
//!
//! One row per balance mutation, never updated or deleted. The `balance`
//! snapshot equals the account balance right after the mutation, so the
//! trail of an account can be replayed (see [`super::audit`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_shared::types::{AccountId, BalanceChangeId, Money, TransactionId};

use super::account::Posting;

/// What produced a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Funds debited from the source by a hold.
    Hold,
    /// Funds credited to the destination by an accept.
    Complete,
    /// Funds credited back to the source by a reject.
    Refund,
}

impl ChangeKind {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hold => "hold",
            Self::Complete => "complete",
            Self::Refund => "refund",
        }
    }

    /// Returns true if this kind reduces the balance.
    #[must_use]
    pub const fn is_debit(self) -> bool {
        matches!(self, Self::Hold)
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hold" => Ok(Self::Hold),
            "complete" => Ok(Self::Complete),
            "refund" => Ok(Self::Refund),
            _ => Err(format!("Unknown balance change kind: {s}")),
        }
    }
}

/// An immutable record of one balance mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// Unique identifier.
    pub id: BalanceChangeId,
    /// Account whose balance changed.
    pub account_id: AccountId,
    /// Transaction that caused the change.
    pub transaction_id: TransactionId,
    /// What produced the change.
    pub kind: ChangeKind,
    /// Signed amount: negative for holds, positive for credits.
    pub amount: Money,
    /// Balance immediately after the change.
    pub balance: Money,
    /// When the change was recorded.
    pub created_at: DateTime<Utc>,
}

impl BalanceChange {
    /// Builds the ledger entry for a posting made on behalf of `transaction_id`.
    #[must_use]
    pub fn record(posting: &Posting, transaction_id: TransactionId, now: DateTime<Utc>) -> Self {
        Self {
            id: BalanceChangeId::new(),
            account_id: posting.account_id,
            transaction_id,
            kind: posting.kind,
            amount: posting.amount,
            balance: posting.balance_after,
            created_at: now,
        }
    }
}
