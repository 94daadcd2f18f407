use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::auth::{generate_jwt, Claims, JwtIdentityProvider};
use crate::config::{AppConfig, StoreBackend};
use crate::database::{DatabaseManager, Fixtures, MemoryStore, PgStore, TenantStore};
use crate::services::{AccountDirectory, HttpAccountDirectory, MemoryAccountDirectory};
use crate::AppState;

#[derive(Parser)]
#[command(name = "worktime-api")]
#[command(about = "Multi-tenant work-time and timecard API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Store backend: postgres or memory (overrides DATABASE_BACKEND)")]
        store: Option<StoreBackend>,

        #[arg(long, help = "YAML fixtures for the memory store (overrides DATABASE_FIXTURES)")]
        fixtures: Option<String>,
    },

    #[command(about = "Mint a development session token")]
    Token {
        #[arg(long)]
        user: String,

        #[arg(long)]
        org: Option<String>,

        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

pub async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        store: None,
        fixtures: None,
    }) {
        Commands::Serve { port, store, fixtures } => {
            if let Some(port) = port {
                config.api.port = port;
            }
            if let Some(store) = store {
                config.database.backend = store;
            }
            if fixtures.is_some() {
                config.database.fixtures_path = fixtures;
            }
            serve(config).await
        }
        Commands::Token { user, org, ttl_hours } => {
            let claims = Claims::new(user, org, chrono::Duration::hours(ttl_hours));
            let token = generate_jwt(&claims, &config.security.jwt_secret)?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn TenantStore>> {
    match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            let fixtures = match &config.database.fixtures_path {
                Some(path) => Fixtures::load(path).with_context(|| format!("failed to load fixtures from {}", path))?,
                None => Fixtures::default(),
            };
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::with_fixtures(fixtures)?))
        }
    }
}

fn build_directory(config: &AppConfig) -> anyhow::Result<Arc<dyn AccountDirectory>> {
    if config.identity.secret_key.is_empty() {
        tracing::warn!("IDENTITY_SECRET_KEY not set; subscription metadata is kept in memory");
        return Ok(Arc::new(MemoryAccountDirectory::new()));
    }
    Ok(Arc::new(HttpAccountDirectory::new(&config.identity)?))
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET not set; every request will be unauthenticated");
    }

    let state = AppState::new(
        build_store(&config).await?,
        Arc::new(JwtIdentityProvider::new(&config.security)),
        build_directory(&config)?,
        &config.api,
        &config.security,
    );
    let app = crate::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Work-time API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
