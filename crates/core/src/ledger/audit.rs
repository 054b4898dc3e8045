//! Audit trail replay.
//!
//! Re-applies an account's balance changes in order and checks every
//! recorded snapshot against the running balance.

use thiserror::Error;
use vault_shared::types::{AccountId, Money};

use super::balance_change::BalanceChange;

/// Inconsistencies found while replaying a trail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// Entry belongs to another account.
    #[error("Entry {index} belongs to account {found}, expected {expected}")]
    ForeignEntry {
        /// Position in the trail.
        index: usize,
        /// Account being replayed.
        expected: AccountId,
        /// Account on the entry.
        found: AccountId,
    },

    /// Sign of the amount does not match the change kind.
    #[error("Entry {index} has amount {amount} inconsistent with its kind")]
    SignMismatch {
        /// Position in the trail.
        index: usize,
        /// Recorded amount.
        amount: Money,
    },

    /// Recorded snapshot differs from the replayed balance.
    #[error("Entry {index} records balance {recorded}, replay gives {expected}")]
    SnapshotMismatch {
        /// Position in the trail.
        index: usize,
        /// Balance computed by replay.
        expected: Money,
        /// Balance stored on the entry.
        recorded: Money,
    },

    /// Running balance overflowed.
    #[error("Balance overflow at entry {0}")]
    Overflow(usize),
}

/// Replays `changes` for `account_id` starting from `opening`.
///
/// Returns the closing balance, which must equal the account's stored
/// balance when the trail is complete.
pub fn replay(
    account_id: AccountId,
    opening: Money,
    changes: &[BalanceChange],
) -> Result<Money, AuditError> {
    let mut running = opening;

    for (index, change) in changes.iter().enumerate() {
        if change.account_id != account_id {
            return Err(AuditError::ForeignEntry {
                index,
                expected: account_id,
                found: change.account_id,
            });
        }

        let sign_ok = if change.kind.is_debit() {
            change.amount.is_negative()
        } else {
            change.amount.is_positive()
        };
        if !sign_ok {
            return Err(AuditError::SignMismatch {
                index,
                amount: change.amount,
            });
        }

        running = running
            .checked_add(change.amount)
            .ok_or(AuditError::Overflow(index))?;

        if running != change.balance {
            return Err(AuditError::SnapshotMismatch {
                index,
                expected: running,
                recorded: change.balance,
            });
        }
    }

    Ok(running)
}
