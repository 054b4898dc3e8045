//! Hold transaction queries.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, Unchanged,
};
use vault_core::ledger::Transaction;
use vault_shared::types::{InvoiceId, TransactionId};

use crate::entities::transactions;

/// Loads a transaction without locking it.
pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: TransactionId,
) -> Result<Option<Transaction>, DbErr> {
    let model = transactions::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?;
    Ok(model.map(Transaction::from))
}

/// Loads a transaction under an exclusive row lock.
pub async fn find_for_update<C: ConnectionTrait>(
    conn: &C,
    id: TransactionId,
) -> Result<Option<Transaction>, DbErr> {
    if super::needs_write_claim(conn) {
        transactions::Entity::update_many()
            .col_expr(transactions::Column::Status, Expr::col(transactions::Column::Status).into())
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .exec(conn)
            .await?;
    }
    let model = transactions::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await?;
    Ok(model.map(Transaction::from))
}

/// Records a freshly authorized hold.
pub async fn insert<C: ConnectionTrait>(conn: &C, transaction: &Transaction) -> Result<(), DbErr> {
    transactions::ActiveModel {
        id: Set(transaction.id.into_inner()),
        invoice_id: Set(transaction.invoice_id.into_inner()),
        amount: Set(transaction.amount.minor()),
        source_account_id: Set(transaction.source_account_id.into_inner()),
        destination_account_id: Set(transaction.destination_account_id.into_inner()),
        status: Set(transaction.status.into()),
        created_at: Set(transaction.created_at.into()),
        closed_at: Set(transaction.closed_at.map(Into::into)),
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// Persists the terminal status and close time.
pub async fn close<C: ConnectionTrait>(conn: &C, transaction: &Transaction) -> Result<(), DbErr> {
    transactions::ActiveModel {
        id: Unchanged(transaction.id.into_inner()),
        status: Set(transaction.status.into()),
        closed_at: Set(transaction.closed_at.map(Into::into)),
        ..Default::default()
    }
    .update(conn)
    .await?;
    Ok(())
}

/// All holds ever placed against an invoice, oldest first.
pub async fn list_for_invoice<C: ConnectionTrait>(
    conn: &C,
    invoice_id: InvoiceId,
) -> Result<Vec<Transaction>, DbErr> {
    let models = transactions::Entity::find()
        .filter(transactions::Column::InvoiceId.eq(invoice_id.into_inner()))
        .order_by_asc(transactions::Column::CreatedAt)
        .order_by_asc(transactions::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().map(Transaction::from).collect())
}
