//! HTTP API for the tic-tac-toe arena.
//!
//! This crate puts an Axum router in front of [`arena_core::Arena`]:
//!
//! - **Matchmaking** (`POST /api/join_matchmaking`,
//!   `GET /api/find_game/{username}`)
//! - **Series** (`GET /api/game/{lobby_id}`,
//!   `POST /api/game/{lobby_id}/move`, `DELETE /api/lobby/{lobby_id}`)
//! - **Status** (`GET /`, `GET /api/health`)
//!
//! Handlers hold no state of their own. Everything lives in the arena
//! carried by [`AppState`], and every engine rejection is converted into
//! a JSON error body by [`ApiError`].
//!
//! [`ApiError`]: error::ApiError

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
