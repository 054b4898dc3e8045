//! Transfer error types.
//!
//! Every failure of a hold, accept or reject surfaces as exactly one of
//! these kinds. Store failures keep the original error as their source.

use thiserror::Error;
use vault_shared::AppError;
use vault_shared::types::{AccountId, InvoiceId, Money, TransactionId};

use super::transaction::TransactionStatus;

/// Boxed error from the persistence layer.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while moving funds.
#[derive(Debug, Error)]
pub enum TransferError {
    // ========== Not Found ==========
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    // ========== Invoice State ==========
    /// Invoice has already been settled.
    #[error("Invoice {0} is already paid")]
    InvoiceAlreadyPaid(InvoiceId),

    /// Invoice already carries a hold awaiting settlement.
    #[error("Invoice {0} already has an open hold")]
    InvoiceOnHold(InvoiceId),

    /// No source account was given and none is bound to the invoice.
    #[error("Invoice {0} has no source account bound")]
    SourceNotBound(InvoiceId),

    // ========== Balance ==========
    /// Debit would drive the balance below zero.
    #[error("Insufficient funds in account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The account being debited.
        account_id: AccountId,
        /// Balance before the attempted debit.
        balance: Money,
        /// Amount requested.
        requested: Money,
    },

    /// Amount must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Money),

    /// Balance arithmetic overflowed.
    #[error("Balance overflow on account {0}")]
    AmountOverflow(AccountId),

    // ========== Transaction State ==========
    /// Transaction is no longer in `Authorization`.
    #[error("Transaction {id} is closed ({status})")]
    TransactionClosed {
        /// The transaction.
        id: TransactionId,
        /// Its terminal status.
        status: TransactionStatus,
    },

    /// Externally-driven transfer was invoked more than once.
    #[error("Transfer already used")]
    TransferAlreadyUsed,

    // ========== Policy ==========
    /// Source and destination hold different currencies.
    #[error("Currency mismatch: {source_currency} to {destination_currency}")]
    CurrencyMismatch {
        /// Source account currency.
        source_currency: String,
        /// Destination account currency.
        destination_currency: String,
    },

    /// Source and destination are the same account.
    #[error("Source and destination are the same account: {0}")]
    SameAccount(AccountId),

    /// Amount exceeds the configured per-transfer limit.
    #[error("Amount {amount} exceeds transfer limit {limit}")]
    LimitExceeded {
        /// Requested amount.
        amount: Money,
        /// Configured limit.
        limit: Money,
    },

    // ========== Store ==========
    /// Underlying persistence failure.
    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl TransferError {
    /// Wraps a persistence error without altering it.
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::InvoiceAlreadyPaid(_) => "INVOICE_ALREADY_PAID",
            Self::InvoiceOnHold(_) => "INVOICE_ON_HOLD",
            Self::SourceNotBound(_) => "SOURCE_NOT_BOUND",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::AmountOverflow(_) => "AMOUNT_OVERFLOW",
            Self::TransactionClosed { .. } => "TRANSACTION_CLOSED",
            Self::TransferAlreadyUsed => "TRANSFER_ALREADY_USED",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::SameAccount(_) => "SAME_ACCOUNT",
            Self::LimitExceeded { .. } => "LIMIT_EXCEEDED",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed requests
            Self::InvalidAmount(_)
            | Self::SameAccount(_)
            | Self::CurrencyMismatch { .. }
            | Self::SourceNotBound(_) => 400,

            // 404 Not Found
            Self::InvoiceNotFound(_) | Self::AccountNotFound(_) | Self::TransactionNotFound(_) => {
                404
            }

            // 409 Conflict - state errors
            Self::InvoiceAlreadyPaid(_)
            | Self::InvoiceOnHold(_)
            | Self::TransactionClosed { .. }
            | Self::TransferAlreadyUsed => 409,

            // 422 Unprocessable - business rules
            Self::InsufficientFunds { .. }
            | Self::LimitExceeded { .. }
            | Self::AmountOverflow(_) => 422,

            // 500 Internal Server Error
            Self::Store(_) => 500,
        }
    }

    /// Returns true for any of the not-found kinds.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InvoiceNotFound(_) | Self::AccountNotFound(_) | Self::TransactionNotFound(_)
        )
    }
}

impl From<TransferError> for AppError {
    fn from(err: TransferError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            404 => Self::NotFound(message),
            400 => Self::Validation(message),
            409 => Self::Conflict(message),
            422 => Self::BusinessRule(message),
            _ => Self::Database(message),
        }
    }
}
