//! Database layer with `SeaORM` entities, repositories and the transfer engine.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for accounts, invoices, holds and the
//!   balance change journal
//! - Repository functions that run inside any connection or transaction
//! - The transfer engine in its self-contained and caller-driven modes
//! - Database migrations

pub mod engine;
pub mod entities;
pub mod migration;
pub mod repositories;

pub use engine::{AccountCashier, BoundTransfer, TransferEngine};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use vault_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection from the `database` config section.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(config.sql_logging);
    Database::connect(options).await
}
