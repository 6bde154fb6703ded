//! Server binary for the tic-tac-toe arena.
//!
//! Wires the arena engine, its janitor task and the HTTP API together and
//! serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `arena-config.yaml` (or `ARENA_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the arena
//! 4. Start the janitor sweep task
//! 5. Serve the HTTP API until shutdown

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use arena_api::startup::spawn_api;
use arena_api::{AppState, ServerConfig};
use arena_core::config::{ArenaConfig, LogFormat, LoggingConfig};
use arena_core::janitor::spawn_janitor;
use arena_core::Arena;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::ServerBinError;

/// Environment variable naming the config file.
const CONFIG_PATH_ENV: &str = "ARENA_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
const DEFAULT_CONFIG_PATH: &str = "arena-config.yaml";

/// Application entry point for the arena server.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the server cannot
/// bind its address.
#[tokio::main]
async fn main() -> Result<(), ServerBinError> {
    // 1. Load configuration. Logging depends on it, so this comes first.
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(source = %config_source, "arena-server starting");
    info!(
        host = %config.server.host,
        port = config.server.port,
        max_rounds = config.series.max_rounds,
        next_round_delay_ms = config.series.next_round_delay_ms,
        retention_seconds = config.series.retention_seconds,
        queue_ttl_seconds = config.matchmaking.queue_ttl_seconds,
        "Configuration loaded"
    );

    // 3. Create the arena.
    let arena = Arc::new(Arena::new(&config));

    // 4. Start the janitor.
    let janitor = spawn_janitor(Arc::clone(&arena), config.janitor.sweep_interval());

    // 5. Serve until Ctrl-C.
    let state = Arc::new(AppState::new(arena));
    let api = spawn_api(ServerConfig::from(&config.server), state, shutdown_signal())?;
    let result = api.await;

    janitor.abort();
    result??;

    info!("arena-server shutdown complete");
    Ok(())
}

/// Load the configuration named by `ARENA_CONFIG`, or `arena-config.yaml`.
///
/// A missing file falls back to defaults (with environment overrides still
/// applied). Returns the config and a description of where it came from.
fn load_config() -> Result<(ArenaConfig, String), ServerBinError> {
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if config_path.exists() {
        let config = ArenaConfig::from_file(&config_path)?;
        Ok((config, config_path.display().to_string()))
    } else {
        let config = ArenaConfig::parse("")?;
        Ok((config, String::from("defaults")))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Resolve when the process receives `Ctrl-C`.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, serving until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
