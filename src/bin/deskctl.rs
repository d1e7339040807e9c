//! Operational CLI for the request desk service.

use anyhow::Context;
use clap::{Parser, Subcommand};

use servicedesk_api::classifier;
use servicedesk_api::database::manager::DatabaseManager;

#[derive(Parser)]
#[command(name = "deskctl")]
#[command(about = "Service Desk CLI - operations for the request tracking backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Apply the database schema (idempotent)")]
    InitDb,

    #[command(about = "Check database connectivity")]
    Ping,

    #[command(about = "Dry-run the request classifier against sample text")]
    Classify {
        #[arg(help = "Request title")]
        title: String,

        #[arg(help = "Request description", default_value = "")]
        description: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = DatabaseManager::connect().await.context("connecting to database")?;
            DatabaseManager::ensure_schema(&pool).await.context("applying schema")?;
            println!("schema applied");
        }
        Commands::Ping => {
            let pool = DatabaseManager::connect().await.context("connecting to database")?;
            DatabaseManager::health_check(&pool).await.context("pinging database")?;
            println!("database ok");
        }
        Commands::Classify { title, description } => {
            let classification = classifier::classify(&title, &description);
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
    }

    Ok(())
}
