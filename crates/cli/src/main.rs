//! Gadget Grove CLI - Store initialization and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the data directory and empty documents
//! grove-cli init
//!
//! # Load the built-in demo catalog (only into an empty store)
//! grove-cli seed
//!
//! # Create an admin user
//! grove-cli admin create -e admin@example.com -n "Admin Name" -p "password"
//! ```
//!
//! The data directory is taken from `GROVE_DATA_DIR` (default: ./data).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "grove-cli")]
#[command(author, version, about = "Gadget Grove CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and empty documents
    Init,
    /// Load the built-in demo catalog into an empty store
    Seed,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin password
        #[arg(short, long)]
        password: String,
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
        Commands::Init => commands::store::init()?,
        Commands::Seed => commands::store::seed().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => {
                commands::admin::create_user(&email, &name, &password).await?;
            }
        },
    }
    Ok(())
}
