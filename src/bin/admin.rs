//! CLI administration tool for dwarf.
//!
//! Inspects and maintains the record store and the counter without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the raw counter value
//! cargo run --bin dwarf-admin -- counter show
//!
//! # Raise the counter to the number of stored records
//! cargo run --bin dwarf-admin -- counter prime
//!
//! # View statistics
//! cargo run --bin dwarf-admin -- stats
//!
//! # Check store connections
//! cargo run --bin dwarf-admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `dwarf::config`.

use dwarf::application::services::CounterService;
use dwarf::config::{self, Config};
use dwarf::domain::repositories::CounterStore;
use dwarf::infrastructure::{Stores, connect_stores};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing dwarf.
#[derive(Parser)]
#[command(name = "dwarf-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect or prime the counter
    Counter {
        #[command(subcommand)]
        action: CounterAction,
    },

    /// Show statistics
    Stats,

    /// Store operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum CounterAction {
    /// Print the raw counter value
    Show,

    /// Raise the counter to the number of stored records
    Prime {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check record store and counter connections
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let stores = connect(&config).await?;

    let result = match cli.command {
        Commands::Counter { action } => handle_counter_action(action, &stores).await,
        Commands::Stats => handle_stats(&stores).await,
        Commands::Db { action } => handle_db_action(action, &stores).await,
    };

    stores.disconnect().await;
    result
}

async fn connect(config: &Config) -> Result<Stores> {
    println!(
        "{} {}",
        "Connecting to".bright_black(),
        config
            .database_url
            .as_deref()
            .map(config::mask_connection_string)
            .unwrap_or_else(|| "in-memory stores".to_string())
            .bright_black()
    );

    connect_stores(config).await
}

/// Dispatches counter commands.
async fn handle_counter_action(action: CounterAction, stores: &Stores) -> Result<()> {
    let counter = CounterService::new(stores.counter.clone());

    match action {
        CounterAction::Show => {
            let value = counter.current().await?;
            println!("  Counter: {}", value.to_string().bright_green().bold());
        }
        CounterAction::Prime { yes } => prime_counter(&counter, stores, yes).await?,
    }

    Ok(())
}

/// Raises the counter to the current record count after confirmation.
///
/// Never lowers the counter. Run it while the server is stopped: the
/// read-then-write is not atomic with respect to live traffic.
async fn prime_counter(
    counter: &CounterService<dyn CounterStore>,
    stores: &Stores,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔢 Prime Counter".bright_blue().bold());
    println!();

    let records = stores.records.count().await?;
    let current = counter.current().await?;

    println!("  Records: {}", records.to_string().cyan());
    println!("  Counter: {}", current.to_string().cyan());
    println!();

    if current >= records {
        println!("{}", "✅ Counter already covers every record".green());
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Set counter from {} to {}?", current, records))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let value = counter.prime(records).await?;

    println!();
    println!(
        "{} {}",
        "✅ Counter primed to".green().bold(),
        value.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays stored records and the counter.
async fn handle_stats(stores: &Stores) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let records = stores.records.count().await?;
    let counter = stores.counter.current().await?;

    println!(
        "  Records: {}",
        records.to_string().bright_green().bold()
    );
    println!(
        "  Counter: {}",
        counter.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles store diagnostic commands.
async fn handle_db_action(action: DbAction, stores: &Stores) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking store connections...".bright_blue());

            let (records_ok, counter_ok) =
                tokio::join!(stores.records.health_check(), stores.counter.health_check());

            report("Record store", records_ok);
            report("Counter store", counter_ok);

            if !(records_ok && counter_ok) {
                anyhow::bail!("one or more stores are unreachable");
            }
        }
    }

    Ok(())
}

fn report(name: &str, healthy: bool) {
    if healthy {
        println!("  {} {}", "✅".green(), format!("{} OK", name).green().bold());
    } else {
        println!("  {} {}", "❌".red(), format!("{} unreachable", name).red().bold());
    }
}
