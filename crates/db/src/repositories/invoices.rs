//! Invoice queries.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    Set, Unchanged,
};
use vault_core::ledger::{Invoice, InvoiceStatus, NewInvoice};
use vault_shared::types::InvoiceId;

use crate::entities::{invoices, sea_orm_active_enums};

/// Loads an invoice without locking it.
pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: InvoiceId,
) -> Result<Option<Invoice>, DbErr> {
    let model = invoices::Entity::find_by_id(id.into_inner()).one(conn).await?;
    Ok(model.map(Invoice::from))
}

/// Loads an invoice under an exclusive row lock.
pub async fn find_for_update<C: ConnectionTrait>(
    conn: &C,
    id: InvoiceId,
) -> Result<Option<Invoice>, DbErr> {
    if super::needs_write_claim(conn) {
        invoices::Entity::update_many()
            .col_expr(invoices::Column::Paid, Expr::col(invoices::Column::Paid).into())
            .filter(invoices::Column::Id.eq(id.into_inner()))
            .exec(conn)
            .await?;
    }
    let model = invoices::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await?;
    Ok(model.map(Invoice::from))
}

/// Persists the settlement columns: status, paid flag and bound source.
pub async fn update_settlement<C: ConnectionTrait>(
    conn: &C,
    invoice: &Invoice,
) -> Result<(), DbErr> {
    invoices::ActiveModel {
        id: Unchanged(invoice.id.into_inner()),
        status: Set(invoice.status.into()),
        paid: Set(invoice.paid),
        source_account_id: Set(invoice.source_account_id.map(Into::into)),
        updated_at: Set(invoice.updated_at.into()),
        ..Default::default()
    }
    .update(conn)
    .await?;
    Ok(())
}

/// Issues a new unpaid invoice in `auth`.
pub async fn insert<C: ConnectionTrait>(conn: &C, input: NewInvoice) -> Result<Invoice, DbErr> {
    let now = Utc::now().into();
    let model = invoices::ActiveModel {
        id: Set(InvoiceId::new().into_inner()),
        external_key: Set(input.external_key),
        strategy: Set(input.strategy),
        status: Set(sea_orm_active_enums::InvoiceStatus::from(InvoiceStatus::Auth)),
        total: Set(input.total.minor()),
        payload: Set(input.payload),
        paid: Set(false),
        source_account_id: Set(None),
        destination_account_id: Set(input.destination_account_id.into_inner()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;
    Ok(model.into())
}
