//! Stockroom server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use stockroom_core::AppConfig;
use stockroom_server::{AppState, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Stockroom - an inventory management server
#[derive(Parser, Debug)]
#[command(name = "stockroomd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "STOCKROOM_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Stockroom v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("STOCKROOM_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    config
        .store
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid store configuration")?;

    // Initialize the entity store
    let store = stockroom_store::from_config(&config.store)
        .await
        .context("failed to initialize entity store")?;

    // Verify store connectivity before accepting requests.
    store
        .health_check()
        .await
        .context("store health check failed")?;
    tracing::info!("Entity store initialized");

    let bind = config.server.bind.clone();
    let state = AppState::new(config, store);
    let router = create_router(state);

    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{bind}'"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "Listening");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
