//! Invoice aggregate.
//!
//! An invoice is issued with a fixed total and destination. The source
//! account is bound lazily when a hold is placed, and `paid` flips to true
//! exactly once, on accept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_shared::types::{AccountId, InvoiceId, Money};

use super::error::TransferError;

/// Invoice settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued, awaiting a hold.
    Auth,
    /// Funds held, awaiting accept or reject.
    Wait,
    /// Hold accepted; the invoice is paid.
    Accepted,
    /// Hold rejected; the invoice is unpaid and may be held again.
    Rejected,
}

impl InvoiceStatus {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Wait => "wait",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(Self::Auth),
            "wait" => Ok(Self::Wait),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Unknown invoice status: {s}")),
        }
    }
}

/// An invoice to be paid into a destination account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Caller-supplied key (order number, ...).
    pub external_key: String,
    /// Free-form strategy tag set by the issuing flow.
    pub strategy: String,
    /// Settlement status.
    pub status: InvoiceStatus,
    /// Amount due. Never changes after issue.
    pub total: Money,
    /// Arbitrary payload from the issuing flow.
    pub payload: serde_json::Value,
    /// True once a hold has been accepted.
    pub paid: bool,
    /// Account funding the invoice, bound at hold time.
    pub source_account_id: Option<AccountId>,
    /// Account receiving the funds.
    pub destination_account_id: AccountId,
    /// When the invoice was issued.
    pub created_at: DateTime<Utc>,
    /// When the invoice last changed.
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Fails with `InvoiceAlreadyPaid` if the invoice has been settled.
    pub fn ensure_unpaid(&self) -> Result<(), TransferError> {
        if self.paid {
            return Err(TransferError::InvoiceAlreadyPaid(self.id));
        }
        Ok(())
    }

    /// Checks that a new hold may be placed.
    ///
    /// A rejected invoice can be held again; one with an open hold cannot.
    pub fn ensure_holdable(&self) -> Result<(), TransferError> {
        self.ensure_unpaid()?;
        if self.status == InvoiceStatus::Wait {
            return Err(TransferError::InvoiceOnHold(self.id));
        }
        Ok(())
    }

    /// Picks the account to debit: the one given, else the one already bound.
    pub fn resolve_source(&self, requested: Option<AccountId>) -> Result<AccountId, TransferError> {
        requested
            .or(self.source_account_id)
            .ok_or(TransferError::SourceNotBound(self.id))
    }

    /// Records a hold funded by `source`.
    pub fn bind_hold(&mut self, source: AccountId, now: DateTime<Utc>) {
        self.source_account_id = Some(source);
        self.status = InvoiceStatus::Wait;
        self.updated_at = now;
    }

    /// Marks the invoice paid after an accepted hold.
    pub fn settle(&mut self, now: DateTime<Utc>) {
        self.paid = true;
        self.status = InvoiceStatus::Accepted;
        self.updated_at = now;
    }

    /// Returns the invoice to an unpaid state after a rejected hold.
    ///
    /// The bound source is kept so a later hold may reuse it.
    pub fn release(&mut self, now: DateTime<Utc>) {
        self.status = InvoiceStatus::Rejected;
        self.updated_at = now;
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(total: Money, destination: AccountId) -> Self {
        let now = Utc::now();
        Self {
            id: InvoiceId::new(),
            external_key: "order-1".to_string(),
            strategy: "checkout".to_string(),
            status: InvoiceStatus::Auth,
            total,
            payload: serde_json::Value::Null,
            paid: false,
            source_account_id: None,
            destination_account_id: destination,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for issuing an invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    /// Caller-supplied key.
    pub external_key: String,
    /// Strategy tag.
    pub strategy: String,
    /// Amount due, in minor units.
    pub total: Money,
    /// Arbitrary payload.
    pub payload: serde_json::Value,
    /// Account receiving the funds.
    pub destination_account_id: AccountId,
}

impl NewInvoice {
    /// Validates the input. The total must be positive.
    pub fn validate(&self) -> Result<(), TransferError> {
        if !self.total.is_positive() {
            return Err(TransferError::InvalidAmount(self.total));
        }
        Ok(())
    }
}
