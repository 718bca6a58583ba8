use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::{Args, Parser, Subcommand};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use ahorrapp::{
    NewTransaction, Transaction, TransactionId, TransactionType,
    client::{ClientError, DivergencePolicy, SyncConfig, SyncSource, TransactionSync, whatsapp_link},
};

/// Record and review income and expenses from the command line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The base URL of the Ahorrapp API.
    #[arg(long, env = "AHORRAPP_API_URL", default_value = "http://localhost:3001")]
    api_url: String,

    /// How many seconds to wait for each request.
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Where to keep the local copy of the transactions.
    #[arg(long, default_value = "ahorrapp-cache.json")]
    cache_path: PathBuf,

    /// Fail instead of saving changes locally when the server cannot be
    /// reached.
    #[arg(long)]
    strict_sync: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the balance, income and expense totals and the latest
    /// transactions.
    Summary {
        /// How many recent transactions to show.
        #[arg(long, default_value_t = 5)]
        recent: usize,
    },
    /// List every transaction, newest first.
    List,
    /// Record a new transaction.
    Add(AddArgs),
    /// Change some fields of an existing transaction.
    Edit(EditArgs),
    /// Delete a transaction.
    Delete {
        /// The ID of the transaction.
        id: TransactionId,
    },
    /// Manage the local category list.
    Categories {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    /// Record transactions with WhatsApp messages.
    Whatsapp {
        #[command(subcommand)]
        command: WhatsAppCommand,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    /// What the transaction was for.
    #[arg(long)]
    description: String,

    /// The amount, the sign is taken from the type.
    #[arg(long, allow_hyphen_values = true)]
    amount: f64,

    /// The category, e.g. "Salud".
    #[arg(long)]
    category: String,

    /// When the transaction happened, defaults to today.
    #[arg(long)]
    date: Option<String>,

    /// "Ingreso" or "Gasto".
    #[arg(long = "type", default_value = "Gasto")]
    transaction_type: TransactionType,

    /// Mark the transaction as recurring.
    #[arg(long)]
    fixed: bool,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// The ID of the transaction.
    id: TransactionId,

    /// A new description.
    #[arg(long)]
    description: Option<String>,

    /// A new amount, the sign is taken from the type.
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<f64>,

    /// A new category.
    #[arg(long)]
    category: Option<String>,

    /// A new date.
    #[arg(long)]
    date: Option<String>,

    /// A new type, "Ingreso" or "Gasto".
    #[arg(long = "type")]
    transaction_type: Option<TransactionType>,

    /// Whether the transaction is recurring.
    #[arg(long)]
    fixed: Option<bool>,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Show the category names.
    List,
    /// Add a category name.
    Add {
        /// The new category's name.
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum WhatsAppCommand {
    /// Print a link that opens WhatsApp with a message ready to send.
    Link {
        /// The phone number of the WhatsApp bot.
        phone: String,
        /// The message, e.g. "Gasto, comida, bembos, 22.90, 4-2-25".
        message: String,
    },
    /// Send a message to the webhook and wait for the transaction to show up.
    Send {
        /// The message, e.g. "Gasto, comida, bembos, 22.90, 4-2-25".
        message: String,

        /// How many times to check for the new transaction.
        #[arg(long, default_value_t = 5)]
        attempts: u32,

        /// How many seconds to wait between checks.
        #[arg(long, default_value_t = 2)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let config = SyncConfig {
        api_url: cli.api_url,
        timeout: Duration::from_secs(cli.timeout_secs),
        cache_path: cli.cache_path,
        policy: if cli.strict_sync {
            DivergencePolicy::Strict
        } else {
            DivergencePolicy::LocalFallback
        },
    };
    let mut sync = TransactionSync::new(config).await?;

    let result = run_command(&mut sync, cli.command).await;

    if let Some(warning) = sync.warning() {
        eprintln!("Warning: {warning}");
    }

    result
}

async fn run_command(sync: &mut TransactionSync, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Summary { recent } => {
            sync.refresh().await;
            let summary = sync.summary();

            println!("Balance:  {:>10.2}", summary.balance);
            println!("Income:   {:>10.2}", summary.income_total);
            println!("Expenses: {:>10.2}", summary.expense_total);
            println!();
            println!("Recent transactions:");
            print_transactions(sync.recent(recent));
        }
        Command::List => {
            sync.refresh().await;
            print_transactions(sync.transactions());
        }
        Command::Add(args) => {
            sync.refresh().await;
            let new_transaction = NewTransaction {
                description: args.description,
                amount: args.amount,
                category: args.category,
                date: args.date.unwrap_or_else(today),
                is_fixed: args.fixed,
                transaction_type: args.transaction_type,
            };

            let (created, source) = sync.create(new_transaction).await?;
            println!("Added {}", describe(&created, source));
        }
        Command::Edit(args) => {
            sync.refresh().await;
            let existing = sync
                .transactions()
                .iter()
                .find(|transaction| transaction.id == args.id)
                .cloned()
                .ok_or(ClientError::NotFound)?;

            let mut fields = NewTransaction::from(existing);
            if let Some(description) = args.description {
                fields.description = description;
            }
            if let Some(amount) = args.amount {
                fields.amount = amount;
            }
            if let Some(category) = args.category {
                fields.category = category;
            }
            if let Some(date) = args.date {
                fields.date = date;
            }
            if let Some(transaction_type) = args.transaction_type {
                fields.transaction_type = transaction_type;
            }
            if let Some(fixed) = args.fixed {
                fields.is_fixed = fixed;
            }

            let (updated, source) = sync.update(args.id, fields).await?;
            println!("Updated {}", describe(&updated, source));
        }
        Command::Delete { id } => {
            sync.refresh().await;
            let source = sync.delete(id).await?;
            println!("Deleted transaction {id}{}", source_suffix(source));
        }
        Command::Categories { command } => match command {
            CategoryCommand::List => {
                for name in sync.categories() {
                    println!("{name}");
                }
            }
            CategoryCommand::Add { name } => {
                sync.add_category(&name).await?;
                println!("Added category \"{}\"", name.trim());
            }
        },
        Command::Whatsapp { command } => match command {
            WhatsAppCommand::Link { phone, message } => {
                println!("{}", whatsapp_link(&phone, &message)?);
            }
            WhatsAppCommand::Send {
                message,
                attempts,
                interval_secs,
            } => {
                sync.refresh().await;
                let sent = sync.api().send_whatsapp_message(&message).await?;
                println!("Sent, the server recorded {}", describe(&sent, SyncSource::Server));

                let new_transactions = sync
                    .poll_for_new_transactions(attempts, Duration::from_secs(interval_secs))
                    .await;

                if new_transactions.is_empty() {
                    println!("The transaction has not shown up yet, try `ahorrapp list` later.");
                } else {
                    println!("New transactions:");
                    print_transactions(&new_transactions);
                }
            }
        },
    }

    Ok(())
}

/// Today's date as `YYYY-MM-DD`, in local time if the offset is known.
fn today() -> String {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
        .to_string()
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions.");
        return;
    }

    for transaction in transactions {
        println!(
            "{:>5}  {:<12}  {:<16}  {:<24}  {:>10.2}{}",
            transaction.id,
            transaction.date,
            transaction.category,
            transaction.description,
            transaction.amount,
            if transaction.is_fixed { "  (fijo)" } else { "" },
        );
    }
}

fn describe(transaction: &Transaction, source: SyncSource) -> String {
    format!(
        "transaction {}: {} {} {:.2}{}",
        transaction.id,
        transaction.transaction_type,
        transaction.description,
        transaction.amount,
        source_suffix(source)
    )
}

fn source_suffix(source: SyncSource) -> &'static str {
    match source {
        SyncSource::Server => "",
        SyncSource::Local => " (saved locally only)",
    }
}
