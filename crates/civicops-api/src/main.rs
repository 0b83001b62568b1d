use std::path::PathBuf;

use anyhow::Context;
use civicops_api::ApiServer;
use civicops_config::ConfigManager;
use clap::Parser;

/// CivicOps work item API server
#[derive(Debug, Parser)]
#[command(name = "civicops-api", version, about)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./civicops.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let config = manager
        .load_config()
        .context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.logging.tracing_level()?)
        .init();

    let server = ApiServer::new(config)?;
    server.serve_with_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
