//! `SeaORM` Entity for invoices table.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use vault_core::ledger::Invoice;
use vault_shared::types::{AccountId, InvoiceId, Money};

use super::sea_orm_active_enums::InvoiceStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub external_key: String,
    pub strategy: String,
    pub status: InvoiceStatus,
    pub total: i64,
    pub payload: Json,
    pub paid: bool,
    pub source_account_id: Option<Uuid>,
    pub destination_account_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::DestinationAccountId",
        to = "super::accounts::Column::Id"
    )]
    Destination,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::SourceAccountId",
        to = "super::accounts::Column::Id"
    )]
    Source,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Invoice {
    fn from(model: Model) -> Self {
        Self {
            id: InvoiceId::from_uuid(model.id),
            external_key: model.external_key,
            strategy: model.strategy,
            status: model.status.into(),
            total: Money::new(model.total),
            payload: model.payload,
            paid: model.paid,
            source_account_id: model.source_account_id.map(AccountId::from_uuid),
            destination_account_id: AccountId::from_uuid(model.destination_account_id),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
