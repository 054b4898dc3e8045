//! `SeaORM` active enums, stored as short strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use vault_core::ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "auth")]
    Auth,
    #[sea_orm(string_value = "wait")]
    Wait,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "authorization")]
    Authorization,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ChangeKind {
    #[sea_orm(string_value = "hold")]
    Hold,
    #[sea_orm(string_value = "complete")]
    Complete,
    #[sea_orm(string_value = "refund")]
    Refund,
}

impl From<InvoiceStatus> for ledger::InvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Auth => Self::Auth,
            InvoiceStatus::Wait => Self::Wait,
            InvoiceStatus::Accepted => Self::Accepted,
            InvoiceStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<ledger::InvoiceStatus> for InvoiceStatus {
    fn from(status: ledger::InvoiceStatus) -> Self {
        match status {
            ledger::InvoiceStatus::Auth => Self::Auth,
            ledger::InvoiceStatus::Wait => Self::Wait,
            ledger::InvoiceStatus::Accepted => Self::Accepted,
            ledger::InvoiceStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<TransactionStatus> for ledger::TransactionStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Authorization => Self::Authorization,
            TransactionStatus::Accepted => Self::Accepted,
            TransactionStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<ledger::TransactionStatus> for TransactionStatus {
    fn from(status: ledger::TransactionStatus) -> Self {
        match status {
            ledger::TransactionStatus::Authorization => Self::Authorization,
            ledger::TransactionStatus::Accepted => Self::Accepted,
            ledger::TransactionStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<ChangeKind> for ledger::ChangeKind {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Hold => Self::Hold,
            ChangeKind::Complete => Self::Complete,
            ChangeKind::Refund => Self::Refund,
        }
    }
}

impl From<ledger::ChangeKind> for ChangeKind {
    fn from(kind: ledger::ChangeKind) -> Self {
        match kind {
            ledger::ChangeKind::Hold => Self::Hold,
            ledger::ChangeKind::Complete => Self::Complete,
            ledger::ChangeKind::Refund => Self::Refund,
        }
    }
}
