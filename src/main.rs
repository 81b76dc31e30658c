use clap::{Parser, Subcommand};
use database::connection::{connect, run_migrations};
use database::repository::DbRepository;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the Martdash retail analytics backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize the database connection and bring the schema up to date
    let config = configuration::load_config()?;
    let db_pool = connect(
        config.database.max_connections,
        Duration::from_secs(config.database.acquire_timeout_secs),
    )
    .await?;
    run_migrations(&db_pool).await?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            let db_repo = DbRepository::new(db_pool);
            let port = args.port.unwrap_or(config.server.port);
            let addr: SocketAddr = format!("{}:{}", config.server.host, port).parse()?;
            web_server::run_server(addr, db_repo).await?;
        }
        Commands::Migrate => {
            // Migrations already ran as part of the bootstrap above.
            tracing::info!("Migrations are up to date.");
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A retail analytics dashboard backend for a cash-and-carry store.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),
    /// Apply database migrations and exit.
    Migrate,
}

#[derive(Parser)]
struct ServeArgs {
    /// Override the port configured in config.toml.
    #[arg(long)]
    port: Option<u16>,
}
