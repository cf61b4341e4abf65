//! Granite World CLI - Database migrations and setup tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply API database migrations
//! gw-cli migrate
//!
//! # Create the "General Inquiry" product used by the contact form
//! gw-cli seed general-inquiry
//!
//! # Generate admin credentials for the API
//! gw-cli admin hash-password < password.txt
//! gw-cli admin token
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed general-inquiry` - Insert the General Inquiry product
//! - `admin hash-password` - Argon2id hash for `API_ADMIN_PASSWORD_HASH`
//! - `admin token` - Random value for `API_ADMIN_TOKEN`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use granite_world_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "gw-cli")]
#[command(author, version, about = "Granite World CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed required records
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Generate admin credentials
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create the General Inquiry product if missing
    GeneralInquiry {
        /// Product id to use
        #[arg(long, env = "API_GENERAL_INQUIRY_ID", default_value_t = ProductId::GENERAL_INQUIRY)]
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Hash a password for API_ADMIN_PASSWORD_HASH (reads stdin if omitted)
    HashPassword {
        #[arg(long)]
        password: Option<String>,
    },
    /// Generate a random API_ADMIN_TOKEN
    Token,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gw_cli=info,granite_world_api=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::GeneralInquiry { id } => commands::seed::general_inquiry(id).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::HashPassword { password } => commands::admin::hash(password)?,
            AdminAction::Token => commands::admin::token(),
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_id_parsing() {
        let cli = Cli::try_parse_from([
            "gw-cli",
            "seed",
            "general-inquiry",
            "--id",
            "6f1c2a9e-3b0d-4c55-9a51-1e2f3a4b5c6d",
        ])
        .unwrap();
        let Commands::Seed {
            target: SeedTarget::GeneralInquiry { id },
        } = cli.command
        else {
            panic!("expected seed command");
        };
        assert_eq!(id.to_string(), "6f1c2a9e-3b0d-4c55-9a51-1e2f3a4b5c6d");

        assert!(Cli::try_parse_from(["gw-cli", "seed", "general-inquiry", "--id", "nope"]).is_err());
    }
}
