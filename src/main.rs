use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// foodgram - Recipe sharing API
#[derive(Parser)]
#[command(name = "foodgram")]
#[command(about = "Recipe sharing backend: recipes, favorites, subscriptions and shopping lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Import the ingredient catalogue from a JSON file
    LoadIngredients {
        #[arg(long, default_value = "data/ingredients.json")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = foodgram::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    foodgram::observability::init_observability(
        "foodgram",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::LoadIngredients { file } => load_ingredients_command(config, file).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: foodgram::Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    foodgram::cli::serve(config, host, port).await
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: foodgram::Config) -> Result<()> {
    foodgram::cli::migrate(config).await
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: foodgram::Config) -> Result<()> {
    foodgram::cli::reset(config).await
}

#[tracing::instrument(skip(config))]
async fn load_ingredients_command(config: foodgram::Config, file: PathBuf) -> Result<()> {
    foodgram::cli::load_ingredients(config, &file).await
}
