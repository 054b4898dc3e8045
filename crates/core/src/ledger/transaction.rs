//! Hold transaction aggregate and its state machine.
//!
//! A transaction is created by a hold in `Authorization` and moves exactly
//! once to `Accepted` or `Rejected`:
//!
//! ```text
//! Authorization --accept--> Accepted
//! Authorization --reject--> Rejected
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_shared::types::{AccountId, InvoiceId, Money, TransactionId};

use super::balance_change::ChangeKind;
use super::error::TransferError;
use super::invoice::Invoice;

/// Status of a hold transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Funds are held, settlement pending.
    Authorization,
    /// Settled to the destination account.
    Accepted,
    /// Reversed to the source account.
    Rejected,
}

impl TransactionStatus {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authorization => "authorization",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true once the transaction can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authorization" => Ok(Self::Authorization),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Unknown transaction status: {s}")),
        }
    }
}

/// The two ways a hold can be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Credit the destination; the invoice becomes paid.
    Accept,
    /// Credit the source back; the invoice stays unpaid.
    Reject,
}

impl Settlement {
    /// Status the transaction ends in.
    #[must_use]
    pub const fn target_status(self) -> TransactionStatus {
        match self {
            Self::Accept => TransactionStatus::Accepted,
            Self::Reject => TransactionStatus::Rejected,
        }
    }

    /// Kind of the balance change written for the credited account.
    #[must_use]
    pub const fn change_kind(self) -> ChangeKind {
        match self {
            Self::Accept => ChangeKind::Complete,
            Self::Reject => ChangeKind::Refund,
        }
    }

    /// The account that receives the held funds.
    #[must_use]
    pub const fn beneficiary(self, transaction: &Transaction) -> AccountId {
        match self {
            Self::Accept => transaction.destination_account_id,
            Self::Reject => transaction.source_account_id,
        }
    }
}

impl std::fmt::Display for Settlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accept => f.write_str("accept"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// A hold: funds debited from a source against an invoice, awaiting settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Invoice this hold pays for.
    pub invoice_id: InvoiceId,
    /// Amount copied from the invoice total at hold time.
    pub amount: Money,
    /// Account the funds were taken from.
    pub source_account_id: AccountId,
    /// Account the funds go to on accept.
    pub destination_account_id: AccountId,
    /// Current status.
    pub status: TransactionStatus,
    /// When the hold was placed.
    pub created_at: DateTime<Utc>,
    /// When the hold was accepted or rejected.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Opens a new hold for `invoice` funded by `source`.
    #[must_use]
    pub fn authorize(invoice: &Invoice, source: AccountId, now: DateTime<Utc>) -> Self {
        Self {
            id: TransactionId::new(),
            invoice_id: invoice.id,
            amount: invoice.total,
            source_account_id: source,
            destination_account_id: invoice.destination_account_id,
            status: TransactionStatus::Authorization,
            created_at: now,
            closed_at: None,
        }
    }

    /// Fails with `TransactionClosed` unless still in `Authorization`.
    pub fn ensure_open(&self) -> Result<(), TransferError> {
        if self.status.is_terminal() {
            return Err(TransferError::TransactionClosed {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Moves the transaction to the settlement's terminal status.
    pub fn close(
        &mut self,
        settlement: Settlement,
        now: DateTime<Utc>,
    ) -> Result<(), TransferError> {
        self.ensure_open()?;
        self.status = settlement.target_status();
        self.closed_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn open_transaction() -> Transaction {
        let invoice = Invoice::new_for_test(Money::new(100), AccountId::new());
        Transaction::authorize(&invoice, AccountId::new(), Utc::now())
    }

    #[test]
    fn test_authorize_copies_invoice() {
        let destination = AccountId::new();
        let source = AccountId::new();
        let invoice = Invoice::new_for_test(Money::new(250), destination);
        let tx = Transaction::authorize(&invoice, source, Utc::now());

        assert_eq!(tx.invoice_id, invoice.id);
        assert_eq!(tx.amount, Money::new(250));
        assert_eq!(tx.source_account_id, source);
        assert_eq!(tx.destination_account_id, destination);
        assert_eq!(tx.status, TransactionStatus::Authorization);
        assert!(tx.closed_at.is_none());
    }

    #[rstest]
    #[case(Settlement::Accept, TransactionStatus::Accepted)]
    #[case(Settlement::Reject, TransactionStatus::Rejected)]
    fn test_close_moves_to_terminal(
        #[case] settlement: Settlement,
        #[case] expected: TransactionStatus,
    ) {
        let mut tx = open_transaction();
        tx.close(settlement, Utc::now()).unwrap();
        assert_eq!(tx.status, expected);
        assert!(tx.status.is_terminal());
        assert!(tx.closed_at.is_some());
    }

    #[rstest]
    #[case(Settlement::Accept, Settlement::Accept)]
    #[case(Settlement::Accept, Settlement::Reject)]
    #[case(Settlement::Reject, Settlement::Accept)]
    #[case(Settlement::Reject, Settlement::Reject)]
    fn test_closed_transaction_stays_closed(#[case] first: Settlement, #[case] second: Settlement) {
        let mut tx = open_transaction();
        tx.close(first, Utc::now()).unwrap();
        let snapshot = tx.clone();

        let err = tx.close(second, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            TransferError::TransactionClosed { status, .. } if status == first.target_status()
        ));
        assert_eq!(tx, snapshot);
    }

    #[test]
    fn test_beneficiary() {
        let tx = open_transaction();
        assert_eq!(Settlement::Accept.beneficiary(&tx), tx.destination_account_id);
        assert_eq!(Settlement::Reject.beneficiary(&tx), tx.source_account_id);
        assert_eq!(Settlement::Accept.change_kind(), ChangeKind::Complete);
        assert_eq!(Settlement::Reject.change_kind(), ChangeKind::Refund);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            TransactionStatus::Authorization,
            TransactionStatus::Accepted,
            TransactionStatus::Rejected,
        ] {
            assert_eq!(TransactionStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(TransactionStatus::from_str("pending").is_err());
    }
}
