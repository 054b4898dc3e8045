//! Balance change journal. Rows are only ever inserted.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use vault_core::ledger::BalanceChange;
use vault_shared::types::AccountId;

use crate::entities::balance_changes;

/// Appends one journal row.
pub async fn insert<C: ConnectionTrait>(conn: &C, change: &BalanceChange) -> Result<(), DbErr> {
    balance_changes::ActiveModel {
        id: Set(change.id.into_inner()),
        account_id: Set(change.account_id.into_inner()),
        transaction_id: Set(change.transaction_id.into_inner()),
        kind: Set(change.kind.into()),
        amount: Set(change.amount.minor()),
        balance: Set(change.balance.minor()),
        created_at: Set(change.created_at.into()),
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// Journal of one account in posting order.
pub async fn list_for_account<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
) -> Result<Vec<BalanceChange>, DbErr> {
    let models = balance_changes::Entity::find()
        .filter(balance_changes::Column::AccountId.eq(account_id.into_inner()))
        .order_by_asc(balance_changes::Column::CreatedAt)
        .order_by_asc(balance_changes::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().map(BalanceChange::from).collect())
}
