use clap::{Parser, Subcommand};
use flatledger::application::engine::LedgerEngine;
use flatledger::config::Limits;
use flatledger::domain::account::{AccountId, AccountName, TaxId};
use flatledger::infrastructure::json_file::JsonFileStore;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ledger data file
    #[arg(long, env = "FLATLEDGER_DATA_FILE", default_value = "data.json")]
    data_file: PathBuf,

    /// Maximum amount accepted for a single transaction
    #[arg(long, default_value = "1000000")]
    max_amount: Decimal,

    /// Maximum balance an account may reach through deposits
    #[arg(long, default_value = "1000000000000")]
    max_balance: Decimal,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a new account
    Create {
        name: String,
        tax_id: String,
        #[arg(long)]
        initial_balance: Option<Decimal>,
    },
    /// Deposit into an account
    Deposit {
        account_id: AccountId,
        amount: Decimal,
    },
    /// Withdraw from an account
    Withdraw {
        account_id: AccountId,
        amount: Decimal,
    },
    /// Print an account's transaction statement
    Statement { account_id: AccountId },
    /// Print a single account, or null if absent
    Get { account_id: AccountId },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let limits = Limits {
        max_amount: cli.max_amount,
        max_balance: cli.max_balance,
    };
    let store = JsonFileStore::new(&cli.data_file, limits);
    let engine = LedgerEngine::new(store, limits);

    match cli.command {
        Command::Create {
            name,
            tax_id,
            initial_balance,
        } => {
            let name = AccountName::new(name).into_diagnostic()?;
            let tax_id = TaxId::new(tax_id).into_diagnostic()?;
            let account = engine
                .create_account(name, tax_id, initial_balance)
                .await
                .into_diagnostic()?;
            print_json(&account)?;
        }
        Command::Deposit { account_id, amount } => {
            let account = engine.deposit(account_id, amount).await.into_diagnostic()?;
            print_json(&account)?;
        }
        Command::Withdraw { account_id, amount } => {
            let account = engine
                .withdraw(account_id, amount)
                .await
                .into_diagnostic()?;
            print_json(&account)?;
        }
        Command::Statement { account_id } => {
            let statement = engine.get_statement(account_id).await.into_diagnostic()?;
            print_json(&statement)?;
        }
        Command::Get { account_id } => {
            let account = engine.get_account(account_id).await.into_diagnostic()?;
            print_json(&account)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).into_diagnostic()?
    );
    Ok(())
}
