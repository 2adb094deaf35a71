use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod map_port;

#[derive(Parser)]
#[command(name = "chunkscout")]
#[command(about = "Chunk Scout - drive-time chunk discovery and wildlife observation explorer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find reachable chunks for an address, optionally roll and export one
    Find(commands::find::FindArgs),
    /// Show or edit the persisted taxa category selection
    Categories {
        #[command(subcommand)]
        action: commands::categories::CategoriesAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Find(args) => commands::find::run(args).await?,
        Commands::Categories { action } => commands::categories::run(action)?,
    }

    Ok(())
}
