//! Shared application state for the arena HTTP API.
//!
//! [`AppState`] carries the [`Arena`] every handler operates on. It is
//! wrapped in an [`Arc`] and injected through Axum's `State` extractor.

use std::sync::Arc;

use arena_core::{Arena, ArenaConfig};

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The matchmaking and series engine.
    pub arena: Arc<Arena>,
}

impl AppState {
    /// Wrap an existing arena.
    pub const fn new(arena: Arc<Arena>) -> Self {
        Self { arena }
    }

    /// Build a fresh arena from `config`.
    pub fn from_config(config: &ArenaConfig) -> Self {
        Self::new(Arc::new(Arena::new(config)))
    }
}
