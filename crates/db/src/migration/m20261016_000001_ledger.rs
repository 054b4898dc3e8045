//! Ledger schema: accounts, invoices, hold transactions and the
//! append-only balance change journal.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::Currency).string_len(8).not_null())
                    .col(
                        ColumnDef::new(Accounts::ExternalKey)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::Balance)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Accounts::Balance).gte(0)),
                    )
                    .col(ColumnDef::new(Accounts::Metadata).json().not_null())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoices::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Invoices::ExternalKey)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Invoices::Strategy).string_len(64).not_null())
                    .col(ColumnDef::new(Invoices::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Invoices::Total)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Invoices::Total).gt(0)),
                    )
                    .col(ColumnDef::new(Invoices::Payload).json().not_null())
                    .col(
                        ColumnDef::new(Invoices::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Invoices::SourceAccountId).uuid().null())
                    .col(
                        ColumnDef::new(Invoices::DestinationAccountId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_source_account")
                            .from(Invoices::Table, Invoices::SourceAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_destination_account")
                            .from(Invoices::Table, Invoices::DestinationAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::InvoiceId).uuid().not_null())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Transactions::Amount).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Transactions::SourceAccountId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::DestinationAccountId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ClosedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_invoice")
                            .from(Transactions::Table, Transactions::InvoiceId)
                            .to(Invoices::Table, Invoices::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_source_account")
                            .from(Transactions::Table, Transactions::SourceAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_destination_account")
                            .from(Transactions::Table, Transactions::DestinationAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BalanceChanges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BalanceChanges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BalanceChanges::AccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(BalanceChanges::TransactionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BalanceChanges::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(BalanceChanges::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(BalanceChanges::Balance)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(BalanceChanges::Balance).gte(0)),
                    )
                    .col(
                        ColumnDef::new(BalanceChanges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_balance_changes_account")
                            .from(BalanceChanges::Table, BalanceChanges::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_balance_changes_transaction")
                            .from(BalanceChanges::Table, BalanceChanges::TransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_invoice")
                    .table(Transactions::Table)
                    .col(Transactions::InvoiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_balance_changes_account_created")
                    .table(BalanceChanges::Table)
                    .col(BalanceChanges::AccountId)
                    .col(BalanceChanges::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BalanceChanges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Currency,
    ExternalKey,
    Balance,
    Metadata,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    ExternalKey,
    Strategy,
    Status,
    Total,
    Payload,
    Paid,
    SourceAccountId,
    DestinationAccountId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    InvoiceId,
    Amount,
    SourceAccountId,
    DestinationAccountId,
    Status,
    CreatedAt,
    ClosedAt,
}

#[derive(DeriveIden)]
enum BalanceChanges {
    Table,
    Id,
    AccountId,
    TransactionId,
    Kind,
    Amount,
    Balance,
    CreatedAt,
}
