//! SQLWin Server - interactive SQL window functions cheat sheet
//!
//! Usage:
//!   sqlwin [OPTIONS]
//!
//! Options:
//!   -c, --config <PATH>   Configuration file (default: sqlwin.yml)
//!   -H, --host <HOST>     Bind address (overrides config)
//!   -p, --port <PORT>     HTTP port (overrides config)
//!   --generate-config     Write the default configuration and exit

mod config;

use anyhow::Context;
use clap::Parser;
use config::{ServerConfig, DEFAULT_CONFIG_PATH};
use sqlwin_core::SampleCatalog;
use sqlwin_engine::QueryRunner;
use sqlwin_web::{create_router, AppState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "sqlwin")]
#[command(author, version, about = "Interactive SQL window functions cheat sheet")]
struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Write the default configuration file and exit
    #[arg(long)]
    generate_config: bool,
}

/// Load the config file; a missing file means defaults, a broken one a warning
fn load_config(path: &Path) -> ServerConfig {
    if !path.exists() {
        return ServerConfig::default();
    }
    match ServerConfig::from_file(path) {
        Ok(c) => {
            println!("Loaded configuration from: {}", path.display());
            c
        }
        Err(e) => {
            eprintln!("Warning: Failed to load {}: {}", path.display(), e);
            eprintln!("Using default configuration");
            ServerConfig::default()
        }
    }
}

fn init_logging(config: &ServerConfig) -> anyhow::Result<()> {
    // RUST_LOG wins over the configured level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level().as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(config.logging.show_target)
        .with_thread_ids(config.logging.show_thread_ids)
        .with_file(config.logging.show_location)
        .with_line_number(config.logging.show_location)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("SIGINT received, shutting down gracefully...");
        }
        _ = terminate => {
            info!("SIGTERM received, shutting down gracefully...");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Generate config and exit if requested
    if cli.generate_config {
        let path = cli.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        ServerConfig::write_default(&path)?;
        println!("Generated default configuration: {}", path.display());
        return Ok(());
    }

    let config_path = cli.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = load_config(&config_path);

    // Apply command line overrides
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config)?;

    info!("Starting SQLWin v{}", env!("CARGO_PKG_VERSION"));
    info!(
        max_rows = config.engine.max_rows,
        query_timeout_ms = config.engine.query_timeout_ms,
        max_concurrent_queries = config.server.max_concurrent_queries,
        queue_timeout_ms = config.queue_timeout().as_millis() as u64,
        "Query limits"
    );

    let catalog = Arc::new(SampleCatalog::standard().context("Failed to build sample data")?);
    let runner = {
        let catalog = Arc::clone(&catalog);
        let runner_config = config.to_runner_config();
        tokio::task::spawn_blocking(move || QueryRunner::new(&catalog, runner_config))
            .await
            .context("Runner initialization task failed")??
    };
    info!(tables = catalog.len(), sqlite = runner.engine_version(), "Sample data loaded");

    let request_timeout = config.request_timeout();
    let app_state = Arc::new(AppState::new(
        Arc::new(runner),
        catalog,
        config.server.max_concurrent_queries,
        config.queue_timeout(),
    ));
    let app = create_router(app_state, request_timeout);

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);
    info!("Query endpoint: POST http://{}/api/query", addr);
    info!("Health check: GET http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}
