use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use trivia_api::db::{self, backup, run_migrations};
use trivia_api::server::app::run_server;
use trivia_api::settings::Settings;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and serve the HTTP API (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Export categories and questions as CSV files
    Export { path: PathBuf },
    /// Replace categories and questions with a previous export
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load().context("Cannot load settings")?;
    let pool = db::establish_connection(&settings.database_url)
        .await
        .context("Cannot connect to DB")?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool).await.context("Cannot run migrations")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(pool, &settings).await?,
        Commands::Migrate => tracing::info!("Database is up to date"),
        Commands::Export { path } => backup::export_data(&pool, &path)
            .await
            .context("Cannot export")?,
        Commands::Import { path } => backup::import_data(&pool, &path)
            .await
            .context("Cannot import")?,
    };
    Ok(())
}
