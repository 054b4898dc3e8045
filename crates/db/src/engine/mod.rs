//! The transfer engine.
//!
//! [`ops`] holds the only implementation of hold, accept and reject. The
//! two operating modes wrap it:
//!
//! - [`TransferEngine`] owns a connection and runs every call in its own
//!   database transaction, committing on success and rolling back on error.
//! - [`BoundTransfer`] borrows a transaction opened by the caller, never
//!   commits or rolls back, and accepts exactly one call.

mod bound;
mod cashier;
pub mod ops;
mod standalone;

pub use bound::BoundTransfer;
pub use cashier::AccountCashier;
pub use standalone::TransferEngine;
