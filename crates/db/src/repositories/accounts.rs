//! Account queries.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    Set, Unchanged,
};
use vault_core::ledger::{Account, NewAccount};
use vault_shared::types::{AccountId, Money};

use crate::entities::accounts;

/// Loads an account without locking it.
pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: AccountId,
) -> Result<Option<Account>, DbErr> {
    let model = accounts::Entity::find_by_id(id.into_inner()).one(conn).await?;
    Ok(model.map(Account::from))
}

/// Loads an account and takes an exclusive row lock until the enclosing
/// transaction ends.
pub async fn find_for_update<C: ConnectionTrait>(
    conn: &C,
    id: AccountId,
) -> Result<Option<Account>, DbErr> {
    if super::needs_write_claim(conn) {
        accounts::Entity::update_many()
            .col_expr(accounts::Column::Balance, Expr::col(accounts::Column::Balance).into())
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .exec(conn)
            .await?;
    }
    let model = accounts::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await?;
    Ok(model.map(Account::from))
}

/// Looks an account up by its caller-supplied key.
pub async fn find_by_external_key<C: ConnectionTrait>(
    conn: &C,
    external_key: &str,
) -> Result<Option<Account>, DbErr> {
    let model = accounts::Entity::find()
        .filter(accounts::Column::ExternalKey.eq(external_key))
        .one(conn)
        .await?;
    Ok(model.map(Account::from))
}

/// Writes a new balance. Only `balance` and `updated_at` are touched.
pub async fn update_balance<C: ConnectionTrait>(
    conn: &C,
    account: &Account,
) -> Result<(), DbErr> {
    accounts::ActiveModel {
        id: Unchanged(account.id.into_inner()),
        balance: Set(account.balance.minor()),
        updated_at: Set(account.updated_at.into()),
        ..Default::default()
    }
    .update(conn)
    .await?;
    Ok(())
}

/// Opens an account with its opening balance.
pub async fn insert<C: ConnectionTrait>(conn: &C, input: NewAccount) -> Result<Account, DbErr> {
    let now = Utc::now().into();
    let model = accounts::ActiveModel {
        id: Set(AccountId::new().into_inner()),
        currency: Set(input.currency),
        external_key: Set(input.external_key),
        balance: Set(input.opening_balance.minor()),
        metadata: Set(input.metadata),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;
    Ok(model.into())
}

/// Sum of all account balances. Used by audits and tests.
///
/// Fails with `DbErr::Custom` rather than wrapping when the sum overflows.
pub async fn total_balance<C: ConnectionTrait>(conn: &C) -> Result<Money, DbErr> {
    let balances: Vec<i64> = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Balance)
        .into_tuple()
        .all(conn)
        .await?;
    balances
        .into_iter()
        .try_fold(Money::ZERO, |total, balance| total.checked_add(Money::new(balance)))
        .ok_or_else(|| DbErr::Custom("sum of account balances overflows i64".to_string()))
}
