use std::net::SocketAddr;
use std::time::Duration;

use database::DbRepository;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Entry point for `cargo run -p web-server`: the same bootstrap as the root
// binary's `serve` command (load configuration, connect, migrate), then hand
// the repository to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenvy::dotenv().ok();
    let config = configuration::load_config()?;

    let db_pool = database::connect(
        config.database.max_connections,
        Duration::from_secs(config.database.acquire_timeout_secs),
    )
    .await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    web_server::run_server(addr, db_repo).await
}
