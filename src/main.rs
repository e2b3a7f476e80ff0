use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod edit;
mod models;
mod normalize;
mod store;

use commands::{ConfigCommand, RecipeCommand};
use config::Config;
use store::Backend;

#[derive(Parser)]
#[command(name = "recipebook")]
#[command(version)]
#[command(about = "Keep a book of recipes with ingredients, instructions and nutrition facts", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add, list, show and edit recipes
    Recipe(RecipeCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Diagnostics go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipebook=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Recipe(cmd)) => {
            let store = Backend::open(&config).await?;
            cmd.run(&store).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
