//! Marketstall CLI - seed validation and business inspection.
//!
//! # Usage
//!
//! ```bash
//! # Check a seed file before deploying it
//! ms-cli seed validate seed/businesses.yaml
//!
//! # List businesses and their lifecycle state
//! ms-cli business list --seed seed/businesses.yaml
//!
//! # Show what the public sees, or what the vendor is editing
//! ms-cli business show green-leaf-market
//! ms-cli business show green-leaf-market --view draft
//!
//! # Businesses owned by an address
//! ms-cli business owned maya@greenleaf.example
//! ```
//!
//! Without `--seed`, commands read `MARKETSTALL_SEED_FILE` and fall back to
//! the bundled demo businesses.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "ms-cli")]
#[command(author, version, about = "Marketstall CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with seed files
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },
    /// Inspect businesses
    Business {
        #[command(subcommand)]
        action: BusinessAction,
    },
}

#[derive(Subcommand)]
enum SeedAction {
    /// Parse and validate a seed file
    Validate {
        /// Path to the YAML seed file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum BusinessAction {
    /// List every business with its lifecycle state
    List {
        /// Seed file to load instead of the configured one
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Show the resolved settings of a business
    Show {
        /// Business slug
        slug: String,

        /// Which view to resolve
        #[arg(long, value_enum, default_value_t = View::Effective)]
        view: View,

        /// Seed file to load instead of the configured one
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// List businesses owned by an email address
    Owned {
        /// Owner email address
        email: String,

        /// Seed file to load instead of the configured one
        #[arg(long)]
        seed: Option<PathBuf>,
    },
}

/// Resolved view selector for `business show`.
#[derive(Clone, Copy, ValueEnum)]
pub enum View {
    /// Published settings, as the public storefront sees them
    Effective,
    /// Pending draft over the baseline settings, as the vendor edits them
    Draft,
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
        Commands::Seed { action } => match action {
            SeedAction::Validate { file } => commands::seed::validate(&file)?,
        },
        Commands::Business { action } => match action {
            BusinessAction::List { seed } => commands::business::list(seed)?,
            BusinessAction::Show { slug, view, seed } => {
                commands::business::show(&slug, view, seed).await?;
            }
            BusinessAction::Owned { email, seed } => commands::business::owned(&email, seed)?,
        },
    }
    Ok(())
}
