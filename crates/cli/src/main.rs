//! Moto Shop CLI - Database migrations and account tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! moto-shop migrate
//!
//! # Seed an account
//! moto-shop account create -u admin -r ADMIN
//!
//! # Show the role the backend resolves for an account
//! moto-shop account role admin
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "moto-shop")]
#[command(author, version, about = "Moto Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage shop accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create a new account
    Create {
        /// Login username
        #[arg(short, long)]
        username: String,

        /// Role code (GUEST, USER, MANAGER, ADMIN)
        #[arg(short, long, default_value = "USER")]
        role: String,
    },
    /// Print the role resolved for an account's stored role code
    Role {
        /// Login username
        username: String,
    },
}

/// Log filter used when `RUST_LOG` is unset. Command results are reported
/// at `info`, so this must not be stricter.
const DEFAULT_LOG_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Account { action } => match action {
            AccountAction::Create { username, role } => {
                commands::account::create(&username, &role).await?;
            }
            AccountAction::Role { username } => {
                commands::account::role(&username).await?;
            }
        },
    }
    Ok(())
}
