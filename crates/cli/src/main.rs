//! Stockroom CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! stockroom-cli migrate
//!
//! # Seed the database with a default user
//! stockroom-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run pending database migrations
//! - `seed` - Upsert the default user the request workflow needs

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stockroom-cli")]
#[command(author, version, about = "Stockroom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with a default user
    Seed,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
