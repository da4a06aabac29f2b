//! `market` command-line shell.
//!
//! Thin driver over [`market::Marketplace`]: every command restores the
//! persisted session, runs one operation and prints the outcome.
//!
//! ```bash
//! market sign-in --user-id B1 --token "$JWT"
//! market items
//! market buy I1 --confirm
//! market history
//! ```

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shared::{format_money, truncate_id, LoginResponse, RawUser};

use market::app::{Marketplace, PurchaseOutcome};
use market::config::ClientConfig;
use market::debug::{self, LogConfig};
use market::model::PurchaseReceipt;
use market::utils::validation::parse_amount;
use market::MarketError;

#[derive(Parser)]
#[command(name = "market", version, about = "Flipzy marketplace client")]
struct Cli {
    /// Ledger/listing service URL (overrides MARKET_API_URL).
    #[arg(long, env = "MARKET_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a session from a token issued by the identity provider.
    SignIn {
        #[arg(long)]
        user_id: String,
        #[arg(long, env = "MARKET_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Forget the stored session.
    Logout,
    /// List the catalog.
    Items,
    /// Buy an item. Real goods need --confirm to be charged.
    Buy {
        item_id: String,
        #[arg(long)]
        confirm: bool,
    },
    /// Add funds to the wallet, e.g. `deposit 25.50`.
    Deposit {
        #[arg(value_parser = parse_amount_arg)]
        amount: Decimal,
    },
    /// Show the wallet balance.
    Balance,
    /// Show bought and sold orders.
    History,
}

fn parse_amount_arg(input: &str) -> Result<Decimal, String> {
    parse_amount(input)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = debug::init_logger(&LogConfig::from_env());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {}", e.user_message());
            if e.offers_top_up() {
                eprintln!("hint: add funds with `market deposit <amount>` and retry");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> market::Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config = config.with_api_url(&url)?;
    }
    tracing::debug!(api_url = %config.api_url, "Starting market shell");

    let market = Marketplace::from_config(&config);
    market.hydrate()?;

    match cli.command {
        Command::SignIn { user_id, token } => {
            let login = LoginResponse {
                user: RawUser {
                    id: user_id.clone(),
                    username: user_id,
                    email: String::new(),
                    full_name: None,
                    avatar_url: None,
                    role: Default::default(),
                    balance: None,
                },
                jwt: token,
            };
            market.sign_in(login)?;
            let user = market.refresh_wallet().await?;
            println!("Signed in as {} ({})", user.name, user.role);
            println!("Balance: {}", format_money(user.balance));
        }
        Command::Logout => {
            market.logout()?;
            println!("Signed out");
        }
        Command::Items => {
            market.load_catalog().await?;
            let items = market.catalog();
            if items.is_empty() {
                println!("No items listed");
            }
            for item in items {
                println!(
                    "{:<12} {:<32} {:>10}  {:<8} {}",
                    truncate_id(&item.id),
                    item.name,
                    format_money(item.price),
                    item.goods_kind,
                    item.category
                );
            }
        }
        Command::Buy { item_id, confirm } => {
            market.load_catalog().await?;
            let (subtotal, tax, total) = market.price_breakdown(&item_id)?.formatted();
            println!("Subtotal {}  Tax {}  Total {}", subtotal, tax, total);

            match market.initiate_purchase(&item_id).await? {
                PurchaseOutcome::Completed(receipt) => print_receipt(&receipt),
                PurchaseOutcome::AwaitingConfirmation(pending) if confirm => {
                    let receipt = market.finalize(pending).await?;
                    print_receipt(&receipt);
                }
                PurchaseOutcome::AwaitingConfirmation(pending) => {
                    println!(
                        "Transaction {} is pending; run again with --confirm to pay",
                        pending.id()
                    );
                    market.cancel(pending);
                }
            }
        }
        Command::Deposit { amount } => {
            let balance = market.deposit(amount).await?;
            println!("Deposited {}. Balance: {}", format_money(amount), format_money(balance));
        }
        Command::Balance => {
            let user = market.refresh_wallet().await?;
            println!("Balance: {}", format_money(user.balance));
        }
        Command::History => {
            let history = market.reconcile_history().await?;
            for entry in &history.entries {
                println!(
                    "{}  {:<10} {:<32} {:>10}  {}",
                    lib_utils::format_date(entry.created_at),
                    entry.role.as_str(),
                    entry.name,
                    format_money(entry.price),
                    entry.status_label.as_str()
                );
            }
            if let Some(MarketError::PartialFetch { feed, .. }) = &history.partial_failure {
                println!("({} orders could not be loaded)", feed);
            }
        }
    }
    Ok(())
}

fn print_receipt(receipt: &PurchaseReceipt) {
    println!(
        "Bought {} for {} ({})",
        receipt.title,
        format_money(receipt.charged_amount.unwrap_or(receipt.price)),
        receipt.status
    );
    if let Some(balance) = receipt.balance {
        println!("Balance: {}", format_money(balance));
    }
}
