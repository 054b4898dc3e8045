//! `SeaORM` entity definitions for the four ledger tables.

pub mod accounts;
pub mod balance_changes;
pub mod invoices;
pub mod sea_orm_active_enums;
pub mod transactions;
