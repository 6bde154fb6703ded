//! Error types for the arena server binary.

/// Top-level error for the arena server binary.
///
/// Wraps each subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ServerBinError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: arena_core::config::ConfigError,
    },

    /// The HTTP server could not be spawned.
    #[error("startup error: {source}")]
    Startup {
        /// The underlying startup error.
        #[from]
        source: arena_api::startup::StartupError,
    },

    /// The HTTP server task panicked or was cancelled.
    #[error("server task failed: {source}")]
    Task {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: arena_api::ServerError,
    },
}
