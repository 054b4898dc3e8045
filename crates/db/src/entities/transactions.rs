//! `SeaORM` Entity for transactions table (holds).

use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use vault_core::ledger::Transaction;
use vault_shared::types::{AccountId, InvoiceId, Money, TransactionId};

use super::sea_orm_active_enums::TransactionStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub amount: i64,
    pub source_account_id: Uuid,
    pub destination_account_id: Uuid,
    pub status: TransactionStatus,
    pub created_at: DateTimeWithTimeZone,
    pub closed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id"
    )]
    Invoices,
    #[sea_orm(has_many = "super::balance_changes::Entity")]
    BalanceChanges,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::balance_changes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BalanceChanges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: TransactionId::from_uuid(model.id),
            invoice_id: InvoiceId::from_uuid(model.invoice_id),
            amount: Money::new(model.amount),
            source_account_id: AccountId::from_uuid(model.source_account_id),
            destination_account_id: AccountId::from_uuid(model.destination_account_id),
            status: model.status.into(),
            created_at: model.created_at.with_timezone(&Utc),
            closed_at: model.closed_at.map(|at| at.with_timezone(&Utc)),
        }
    }
}
