use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use growtree_server::backend::config::ServerConfig;
use growtree_server::backend::{create_router, initialize_backend};

#[derive(Parser)]
#[command(name = "growtree", version, about = "GrowTree study tracker server")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "GROWTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Write a backup of all documents into this directory and exit
    #[arg(long, value_name = "DIR")]
    export_to: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = ServerConfig::load(args.config.as_deref())?;
    info!("Using data directory {}", config.data_dir.display());

    let app_state = initialize_backend(&config).await?;

    if let Some(directory) = args.export_to {
        let path = app_state.data_transfer_service.export_to_directory(&directory).await?;
        info!("Backup written to {}", path.display());
        return Ok(());
    }

    let router = create_router(app_state, &config.cors_origin)?;

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.bind_address))?;
    info!("Starting GrowTree API server at {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router).await?;

    Ok(())
}
