//! MebliHub CLI - Database migrations and catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront session-store migrations
//! mh-cli migrate storefront
//!
//! # Run admin session-store migrations
//! mh-cli migrate admin
//!
//! # Run all migrations
//! mh-cli migrate all
//!
//! # Import catalog JSON files into the backend
//! mh-cli import catalog --dir ./data/catalog --token $ADMIN_JWT
//! mh-cli import catalog --dir ./data/catalog --token $ADMIN_JWT --dry-run
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run session-store migrations
//! - `import catalog` - Push product JSON files to the admin API

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mh-cli")]
#[command(author, version, about = "MebliHub CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Import data into the catalog backend
    Import {
        #[command(subcommand)]
        what: ImportTarget,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run storefront session-store migrations
    Storefront,
    /// Run admin session-store migrations
    Admin,
    /// Run all migrations
    All,
}

#[derive(Subcommand)]
enum ImportTarget {
    /// Import product JSON files into the backend catalog
    Catalog {
        /// Directory containing `*.json` product files
        #[arg(short, long)]
        dir: String,

        /// Admin bearer token for the catalog API
        #[arg(short, long)]
        token: String,

        /// Parse and validate without posting anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
            MigrateTarget::Admin => commands::migrate::admin().await?,
            MigrateTarget::All => {
                commands::migrate::storefront().await?;
                commands::migrate::admin().await?;
            }
        },
        Commands::Import { what } => match what {
            ImportTarget::Catalog {
                dir,
                token,
                dry_run,
            } => {
                commands::import::catalog(&dir, &token, dry_run).await?;
            }
        },
    }
    Ok(())
}
