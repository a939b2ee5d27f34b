//! Laundry Lane CLI - Sign in and inspect the persisted session.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password from --password or LAUNDRY_PASSWORD)
//! laundry login -e ada@example.com
//!
//! # Show who is signed in, restoring the session from disk
//! laundry whoami
//!
//! # Where would the app send this user on the given route?
//! laundry route "(tabs)" wallet
//!
//! # Run the customer-only guard
//! laundry route --customers-only "(tabs)" orders
//!
//! # Sign out
//! laundry logout
//! ```
//!
//! # Commands
//!
//! - `login` - Sign in and persist the session
//! - `logout` - Clear the session
//! - `whoami` - Restore and print the session
//! - `route` - Evaluate navigation guards for a route

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use laundry_app::auth::{AuthStore, HttpAuthClient};
use laundry_app::config::AppConfig;
use laundry_app::error::AppError;
use laundry_app::storage::FileStore;
use laundry_core::{Email, EmailError};
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "laundry")]
#[command(author, version, about = "Laundry Lane session tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and persist the session
    Login {
        /// Account email address
        #[arg(short, long, value_parser = parse_email)]
        email: Email,

        /// Account password
        #[arg(short, long, env = "LAUNDRY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Restore the persisted session and print the signed-in user
    Whoami,
    /// Evaluate the navigation guards for a route
    Route {
        /// Only admit customers
        #[arg(long)]
        customers_only: bool,

        /// Route segments, e.g. `(tabs) wallet`
        segments: Vec<String>,
    },
}

fn parse_email(s: &str) -> Result<Email, EmailError> {
    Email::parse(s)
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "laundry_app=info,laundry_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let client = HttpAuthClient::new(&config.api_base_url)?;
    let auth = AuthStore::new(client, FileStore::new(&config.storage_path));

    match cli.command {
        Commands::Login { email, password } => {
            commands::session::login(&auth, &email, &SecretString::from(password)).await?;
        }
        Commands::Logout => commands::session::logout(&auth).await,
        Commands::Whoami => commands::session::whoami(&auth).await?,
        Commands::Route {
            customers_only,
            segments,
        } => commands::route::evaluate(&auth, &config, &segments, customers_only).await?,
    }
    Ok(())
}
