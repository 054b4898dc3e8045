//! `SeaORM` Entity for accounts table.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use vault_core::ledger::Account;
use vault_shared::types::{AccountId, Money};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub currency: String,
    #[sea_orm(unique)]
    pub external_key: String,
    pub balance: i64,
    pub metadata: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::balance_changes::Entity")]
    BalanceChanges,
}

impl Related<super::balance_changes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BalanceChanges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            id: AccountId::from_uuid(model.id),
            currency: model.currency,
            external_key: model.external_key,
            balance: Money::new(model.balance),
            metadata: model.metadata,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
