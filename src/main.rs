//! Dice service entry point.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use dice_service::api::{create_router, AppState};
use dice_service::config::{Config, ReadinessSource, READY_VAR};
use dice_service::error::ServiceError;
use dice_service::logging::{build_filter, init_logging};
use dice_service::utils::shutdown_signal;

/// Dice-roll HTTP microservice.
#[derive(Parser, Debug)]
#[command(name = "dice-service")]
#[command(about = "HTTP service exposing /health, /dice and /metrics")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// Log file path (overrides LOG_PATH).
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(log_path) = args.log_path {
        config.log_path = log_path;
    }
    config.validate()?;

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Serve) | None => cmd_serve(config, args.verbose).await,
    }
}

/// Print the effective configuration without starting the server.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    let readiness = ReadinessSource::Environment;

    println!("======================================================================");
    println!("DICE SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");
    println!("  Port:      {}", config.port);
    println!("  Log Path:  {}", config.log_path.display());
    println!("  Log Level: {}", config.rust_log);
    println!(
        "  Ready:     {} ({}={})",
        readiness.is_ready(),
        READY_VAR,
        std::env::var(READY_VAR).unwrap_or_else(|_| "<unset>".to_string())
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config, verbose: bool) -> anyhow::Result<()> {
    let _log_guard = init_logging(&config.log_path, build_filter(verbose, &config.rust_log))?;

    let state = AppState::new(ReadinessSource::Environment);
    info!(
        log_path = %config.log_path.display(),
        readiness = state.readiness().describe(),
        "Starting dice service"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServiceError::Bind { addr, source })?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dice service stopped");
    Ok(())
}
