use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use honeytoken_server::registry::{NewHoneytoken, RegistryError, SqliteRegistry};

#[derive(Parser)]
#[command(name = "honeytoken-admin")]
#[command(about = "Manage the honeytoken registry", long_about = None)]
struct Cli {
    /// Token registry database.
    #[arg(short, long, default_value = "sqlite://honeytokens.db")]
    database: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new honeytoken URL
    Add {
        /// Exact request target, including any query string
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        comment: String,
        /// Alert receiver (e-mail address)
        #[arg(long)]
        notify: String,
    },
    /// List all honeytokens
    List,
    /// Show one honeytoken
    Show { id: i64 },
    /// Remove a honeytoken
    Remove { id: i64 },
}

#[derive(Debug, Error)]
enum AdminError {
    #[error("no honeytoken with id {0}")]
    NoSuchToken(i64),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Output(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let registry = SqliteRegistry::open(&cli.database).await?;

    let result = execute(cli.command, &registry).await;
    registry.close().await;
    result?;
    Ok(())
}

async fn execute(command: Commands, registry: &SqliteRegistry) -> Result<(), AdminError> {
    match command {
        Commands::Add {
            url,
            title,
            comment,
            notify,
        } => {
            let token = registry
                .insert(NewHoneytoken {
                    url,
                    title,
                    comment,
                    notify_receiver: notify,
                })
                .await?;
            print_json(&token)?;
        }
        Commands::List => {
            print_json(&registry.list().await?)?;
        }
        Commands::Show { id } => {
            let token = registry.get(id).await?.ok_or(AdminError::NoSuchToken(id))?;
            print_json(&token)?;
        }
        Commands::Remove { id } => {
            if !registry.delete(id).await? {
                return Err(AdminError::NoSuchToken(id));
            }
            println!("Removed honeytoken {id}");
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
