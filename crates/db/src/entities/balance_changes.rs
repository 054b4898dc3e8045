//! `SeaORM` Entity for balance_changes table. Rows are append-only.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use vault_core::ledger::BalanceChange;
use vault_shared::types::{AccountId, BalanceChangeId, Money, TransactionId};

use super::sea_orm_active_enums::ChangeKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "balance_changes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub transaction_id: Uuid,
    pub kind: ChangeKind,
    pub amount: i64,
    pub balance: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id"
    )]
    Transactions,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BalanceChange {
    fn from(model: Model) -> Self {
        Self {
            id: BalanceChangeId::from_uuid(model.id),
            account_id: AccountId::from_uuid(model.account_id),
            transaction_id: TransactionId::from_uuid(model.transaction_id),
            kind: model.kind.into(),
            amount: Money::new(model.amount),
            balance: Money::new(model.balance),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
