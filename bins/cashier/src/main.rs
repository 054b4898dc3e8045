//! Operator CLI for the vault ledger.
//!
//! Drives the transfer engine in-process against the configured database:
//! open accounts, issue invoices, place holds and settle them, and inspect
//! balances and their audit trail.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vault_core::ledger::{Cashier, NewAccount, NewInvoice, Transfer, TransferError, replay};
use vault_db::migration::Migrator;
use vault_db::repositories::{accounts, balance_changes, invoices, transactions};
use vault_db::{AccountCashier, TransferEngine};
use vault_shared::{AppConfig, AppError};
use vault_shared::config::LogConfig;
use vault_shared::types::{AccountId, InvoiceId, Money, TransactionId};

#[derive(Debug, Parser)]
#[command(name = "cashier", about = "Hold, accept and reject transfers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open an account with an opening balance.
    OpenAccount {
        /// Caller-supplied unique key.
        #[arg(long)]
        key: String,
        /// Currency code.
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Opening balance in minor units.
        #[arg(long, default_value_t = 0)]
        balance: i64,
        /// Arbitrary JSON metadata.
        #[arg(long, default_value = "{}")]
        metadata: String,
    },
    /// Issue an invoice payable to an account.
    IssueInvoice {
        /// Account credited on accept.
        #[arg(long)]
        destination: AccountId,
        /// Amount in minor units.
        #[arg(long)]
        total: i64,
        /// Caller-supplied unique key. Generated when omitted.
        #[arg(long)]
        key: Option<String>,
        /// Strategy tag recorded on the invoice.
        #[arg(long, default_value = "checkout")]
        strategy: String,
    },
    /// Hold the invoice total from a source account.
    Hold {
        /// Invoice to pay.
        #[arg(long)]
        invoice: InvoiceId,
        /// Account to debit. Defaults to the one already bound to the invoice.
        #[arg(long)]
        source: Option<AccountId>,
    },
    /// Settle a hold into its destination.
    Accept {
        /// Transaction returned by `hold`.
        transaction: TransactionId,
    },
    /// Return a hold to its source.
    Reject {
        /// Transaction returned by `hold`.
        transaction: TransactionId,
    },
    /// Check whether a transfer would currently be allowed.
    Check {
        /// Account to debit.
        #[arg(long)]
        source: AccountId,
        /// Account to credit.
        #[arg(long)]
        destination: AccountId,
        /// Amount in minor units.
        #[arg(long)]
        amount: i64,
    },
    /// Print an account balance.
    Balance {
        /// Account to inspect.
        account: AccountId,
    },
    /// Print and verify an account's balance changes.
    History {
        /// Account to inspect.
        account: AccountId,
    },
    /// List the holds placed against an invoice.
    Holds {
        /// Invoice to inspect.
        invoice: InvoiceId,
    },
}

/// Tags a transfer failure with its stable code, e.g. `INSUFFICIENT_FUNDS`.
fn coded(err: TransferError) -> anyhow::Error {
    let code = err.error_code();
    anyhow::Error::new(AppError::from(err)).context(code)
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log.filter.clone().into());
    tracing_subscriber::registry()
        .with(filter)
        .with(log.json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!log.json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log);

    let db = vault_db::connect_with(&config.database).await?;
    Migrator::up(&db, None).await?;
    info!("Connected to database");

    match cli.command {
        Command::OpenAccount {
            key,
            currency,
            balance,
            metadata,
        } => {
            let metadata: Value =
                serde_json::from_str(&metadata).context("metadata must be valid JSON")?;
            let input = NewAccount {
                currency,
                external_key: key,
                opening_balance: Money::new(balance),
                metadata,
            };
            input.validate().map_err(coded)?;
            let account = accounts::insert(&db, input).await?;
            println!("{}", account.id);
        }
        Command::IssueInvoice {
            destination,
            total,
            key,
            strategy,
        } => {
            let input = NewInvoice {
                external_key: key.unwrap_or_else(|| InvoiceId::new().to_string()),
                strategy,
                total: Money::new(total),
                payload: Value::Object(serde_json::Map::new()),
                destination_account_id: destination,
            };
            input.validate().map_err(coded)?;
            let invoice = invoices::insert(&db, input).await?;
            println!("{}", invoice.id);
        }
        Command::Hold { invoice, source } => {
            let engine = TransferEngine::new(db);
            let transaction_id = engine.hold(invoice, source).await.map_err(coded)?;
            println!("{transaction_id}");
        }
        Command::Accept { transaction } => {
            TransferEngine::new(db)
                .accept(transaction)
                .await
                .map_err(coded)?;
            println!("accepted");
        }
        Command::Reject { transaction } => {
            TransferEngine::new(db)
                .reject(transaction)
                .await
                .map_err(coded)?;
            println!("rejected");
        }
        Command::Check {
            source,
            destination,
            amount,
        } => {
            let cashier = AccountCashier::from_config(db, &config.transfer);
            cashier
                .can_transfer(source, destination, Money::new(amount))
                .await
                .map_err(coded)?;
            println!("allowed");
        }
        Command::Balance { account } => {
            let account = accounts::find_by_id(&db, account)
                .await?
                .with_context(|| format!("Account not found: {account}"))?;
            println!("{} {}", account.balance, account.currency);
        }
        Command::History { account } => {
            let current = accounts::find_by_id(&db, account)
                .await?
                .with_context(|| format!("Account not found: {account}"))?;
            let trail = balance_changes::list_for_account(&db, account).await?;
            for change in &trail {
                println!(
                    "{} {:<8} {:>12} {:>12} {}",
                    change.created_at.to_rfc3339(),
                    change.kind,
                    change.amount,
                    change.balance,
                    change.transaction_id
                );
            }

            let moved = trail
                .iter()
                .try_fold(Money::ZERO, |sum, change| sum.checked_add(change.amount))
                .context("Balance change sum overflowed")?;
            let opening = current
                .balance
                .checked_sub(moved)
                .context("Opening balance overflowed")?;
            let closing = replay(account, opening, &trail)?;
            println!("opening {opening}, closing {closing}, trail verified");
        }
        Command::Holds { invoice } => {
            for transaction in transactions::list_for_invoice(&db, invoice).await? {
                println!(
                    "{} {:<13} {:>12} {} -> {}",
                    transaction.id,
                    transaction.status,
                    transaction.amount,
                    transaction.source_account_id,
                    transaction.destination_account_id
                );
            }
        }
    }

    Ok(())
}
