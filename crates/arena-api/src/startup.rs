//! Background startup helper used by the server binary.
//!
//! [`spawn_api`] validates the listen address eagerly, then runs
//! [`start_server`](crate::server::start_server) on a Tokio task.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the API server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the arena HTTP server on a background Tokio task.
///
/// The task ends when `shutdown` resolves or the server fails. A failure
/// inside the task is logged and also returned through the handle.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address does not
/// parse. This is checked before the task is spawned.
pub fn spawn_api<F>(
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<JoinHandle<Result<(), ServerError>>, StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move {
        let result = crate::server::start_server(&config, state, shutdown).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Arena server exited with error");
        }
        result
    });

    tracing::info!(%addr, "Arena server spawned on background task");

    Ok(handle)
}
