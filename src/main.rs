use clap::Parser;
use tracing_subscriber::EnvFilter;
use worktime_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = worktime_api::config::config().clone();
    tracing::info!("Starting work-time API in {:?} mode", config.environment);

    let cli = Cli::parse();
    worktime_api::cli::run(cli, config).await
}
