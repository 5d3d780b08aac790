//! freedns CLI - operator tooling for the subdomain service.
//!
//! # Usage
//!
//! ```bash
//! # Create the data directory and empty data files
//! freedns-cli init
//!
//! # Manage parent domains
//! freedns-cli domain add -n freedns.example -z <zone-id> -t <api-token>
//! freedns-cli domain list
//! freedns-cli domain remove -n freedns.example
//!
//! # Manage purchased-slot limits
//! freedns-cli limit set -e user@example.com -l 5
//! freedns-cli limit reset -e user@example.com
//! ```
//!
//! The data directory is taken from `--data-dir`, then `FREEDNS_DATA_DIR`,
//! then defaults to `data`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "freedns-cli")]
#[command(author, version, about = "freedns operator tools")]
struct Cli {
    /// Data directory (overrides FREEDNS_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and empty data files
    Init,
    /// Manage parent domains
    Domain {
        #[command(subcommand)]
        action: DomainAction,
    },
    /// Manage purchased-slot limits
    Limit {
        #[command(subcommand)]
        action: LimitAction,
    },
}

#[derive(Subcommand)]
enum DomainAction {
    /// Verify Cloudflare credentials and add a parent domain
    Add {
        /// Domain name (e.g. freedns.example)
        #[arg(short, long)]
        name: String,

        /// Cloudflare zone ID
        #[arg(short, long)]
        zone_id: String,

        /// Cloudflare API token scoped to the zone
        #[arg(short, long)]
        token: String,

        /// Skip the Cloudflare credential probe
        #[arg(long)]
        skip_verify: bool,
    },
    /// List configured parent domains
    List,
    /// Remove a parent domain (cascades to its subdomains)
    Remove {
        /// Domain name
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Subcommand)]
enum LimitAction {
    /// Set a user's purchased-slot limit
    Set {
        /// User email
        #[arg(short, long)]
        email: String,

        /// New slot limit
        #[arg(short, long)]
        limit: u32,
    },
    /// Reset a user's limit to the default
    Reset {
        /// User email
        #[arg(short, long)]
        email: String,
    },
}

/// Resolve the data directory from flag, environment, or default.
fn data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var("FREEDNS_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let dir = data_dir(cli.data_dir.clone());

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, dir).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Init => commands::init::run(&dir).await?,
        Commands::Domain { action } => match action {
            DomainAction::Add {
                name,
                zone_id,
                token,
                skip_verify,
            } => commands::domain::add(&dir, &name, &zone_id, &token, skip_verify).await?,
            DomainAction::List => commands::domain::list(&dir).await?,
            DomainAction::Remove { name } => commands::domain::remove(&dir, &name).await?,
        },
        Commands::Limit { action } => match action {
            LimitAction::Set { email, limit } => {
                commands::limit::set(&dir, &email, limit).await?;
            }
            LimitAction::Reset { email } => commands::limit::reset(&dir, &email).await?,
        },
    }
    Ok(())
}
