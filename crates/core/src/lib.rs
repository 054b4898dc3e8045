//! Core business logic for Vault.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, state transitions, and balance rules live here.
//!
//! # Modules
//!
//! - `ledger` - Accounts, invoices, hold transactions, balance changes and the
//!   transfer contract implemented by the database layer

pub mod ledger;
