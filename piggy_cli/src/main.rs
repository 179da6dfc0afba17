mod commands;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use piggy_lib::{ApiConfig, Client, FileStore, Session};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "piggy")]
#[command(about = "Look up accounts and recent transactions from the piggy finance service")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// API base URL (overrides PIGGY_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds (overrides PIGGY_API_TIMEOUT_MS)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Token storage file (overrides PIGGY_STORE)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a repository by owner/name
    Repo(commands::repo::RepoArgs),
    /// Log in and store the auth token
    Login(commands::login::LoginArgs),
    /// Forget the stored auth token
    Logout,
    /// List recent transactions grouped by day
    Transactions(commands::transactions::TransactionsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("piggy=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = OutputFormat::parse(&cli.output)?;

    let mut config = ApiConfig::from_env();
    if let Some(url) = &cli.base_url {
        config = config.with_url(url.as_str());
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    let client = Client::new(config).context("failed to set up API client")?;

    let store_path = cli.store.clone().unwrap_or_else(default_store_path);
    tracing::debug!("Using token store {}", store_path.display());
    let session = Session::new(client, FileStore::new(store_path));

    match &cli.command {
        Commands::Repo(args) => commands::repo::run(args, &session, &format).await?,
        Commands::Login(args) => commands::login::run(args, &session, &format).await?,
        Commands::Logout => commands::login::run_logout(&session, &format)?,
        Commands::Transactions(args) => {
            commands::transactions::run(args, &session, &format).await?
        }
    }

    Ok(())
}

fn default_store_path() -> PathBuf {
    if let Some(path) = std::env::var_os("PIGGY_STORE").filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    match std::env::var_os("HOME").filter(|p| !p.is_empty()) {
        Some(home) => PathBuf::from(home).join(".piggy").join("storage.json"),
        None => PathBuf::from(".piggy-storage.json"),
    }
}
