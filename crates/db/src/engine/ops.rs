//! Hold, accept and reject as functions of an open unit of work.
//!
//! Every function validates before it writes, so a returned error leaves
//! nothing behind in the unit of work. The caller still owns commit and
//! rollback.

use chrono::Utc;
use sea_orm::ConnectionTrait;
use tracing::{info, instrument, warn};
use vault_core::ledger::{BalanceChange, ChangeKind, Settlement, Transaction, TransferError};
use vault_shared::types::{AccountId, InvoiceId, TransactionId};

use crate::repositories::{accounts, balance_changes, invoices, transactions};

/// Debits the invoice total from the source account and opens a hold.
///
/// Lock order: invoice, then source account.
#[instrument(skip_all, fields(invoice_id = %invoice_id, source = ?source))]
pub async fn hold<C: ConnectionTrait>(
    conn: &C,
    invoice_id: InvoiceId,
    source: Option<AccountId>,
) -> Result<TransactionId, TransferError> {
    let mut invoice = invoices::find_for_update(conn, invoice_id)
        .await
        .map_err(TransferError::store)?
        .ok_or(TransferError::InvoiceNotFound(invoice_id))?;

    invoice.ensure_holdable().inspect_err(log_rejection)?;
    let source_id = invoice.resolve_source(source).inspect_err(log_rejection)?;

    let mut account = accounts::find_for_update(conn, source_id)
        .await
        .map_err(TransferError::store)?
        .ok_or(TransferError::AccountNotFound(source_id))?;

    let now = Utc::now();
    let transaction = Transaction::authorize(&invoice, source_id, now);
    let posting = account
        .post(ChangeKind::Hold, transaction.amount)
        .inspect_err(log_rejection)?;
    account.updated_at = now;
    invoice.bind_hold(source_id, now);

    invoices::update_settlement(conn, &invoice)
        .await
        .map_err(TransferError::store)?;
    transactions::insert(conn, &transaction)
        .await
        .map_err(TransferError::store)?;
    accounts::update_balance(conn, &account)
        .await
        .map_err(TransferError::store)?;
    balance_changes::insert(conn, &BalanceChange::record(&posting, transaction.id, now))
        .await
        .map_err(TransferError::store)?;

    info!(
        transaction_id = %transaction.id,
        source_account_id = %source_id,
        amount = %transaction.amount,
        balance = %posting.balance_after,
        "Funds held"
    );

    Ok(transaction.id)
}

/// Credits the destination and marks the invoice paid.
pub async fn accept<C: ConnectionTrait>(
    conn: &C,
    transaction_id: TransactionId,
) -> Result<(), TransferError> {
    settle(conn, transaction_id, Settlement::Accept).await
}

/// Returns the held funds to the source. The invoice stays unpaid.
pub async fn reject<C: ConnectionTrait>(
    conn: &C,
    transaction_id: TransactionId,
) -> Result<(), TransferError> {
    settle(conn, transaction_id, Settlement::Reject).await
}

/// Closes an open hold one way or the other.
///
/// Lock order: transaction, invoice, then the credited account.
#[instrument(skip_all, fields(transaction_id = %transaction_id, settlement = %settlement))]
async fn settle<C: ConnectionTrait>(
    conn: &C,
    transaction_id: TransactionId,
    settlement: Settlement,
) -> Result<(), TransferError> {
    let mut transaction = transactions::find_for_update(conn, transaction_id)
        .await
        .map_err(TransferError::store)?
        .ok_or(TransferError::TransactionNotFound(transaction_id))?;
    transaction.ensure_open().inspect_err(log_rejection)?;

    let mut invoice = invoices::find_for_update(conn, transaction.invoice_id)
        .await
        .map_err(TransferError::store)?
        .ok_or(TransferError::InvoiceNotFound(transaction.invoice_id))?;
    invoice.ensure_unpaid().inspect_err(log_rejection)?;

    let beneficiary_id = settlement.beneficiary(&transaction);
    let mut account = accounts::find_for_update(conn, beneficiary_id)
        .await
        .map_err(TransferError::store)?
        .ok_or(TransferError::AccountNotFound(beneficiary_id))?;

    let now = Utc::now();
    let posting = account.post(settlement.change_kind(), transaction.amount)?;
    account.updated_at = now;
    transaction.close(settlement, now)?;
    match settlement {
        Settlement::Accept => invoice.settle(now),
        Settlement::Reject => invoice.release(now),
    }

    transactions::close(conn, &transaction)
        .await
        .map_err(TransferError::store)?;
    accounts::update_balance(conn, &account)
        .await
        .map_err(TransferError::store)?;
    balance_changes::insert(conn, &BalanceChange::record(&posting, transaction.id, now))
        .await
        .map_err(TransferError::store)?;
    invoices::update_settlement(conn, &invoice)
        .await
        .map_err(TransferError::store)?;

    info!(
        account_id = %beneficiary_id,
        amount = %transaction.amount,
        balance = %posting.balance_after,
        status = %transaction.status,
        "Hold settled"
    );

    Ok(())
}

fn log_rejection(err: &TransferError) {
    warn!(error = %err, code = err.error_code(), "Transfer rejected");
}
