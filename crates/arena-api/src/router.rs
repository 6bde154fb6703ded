//! Axum router construction for the arena API.
//!
//! Assembles all routes into a single [`Router`] with permissive CORS,
//! since browser clients are served from other origins.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the arena.
///
/// The router includes:
/// - `GET /` -- service banner
/// - `GET /api/health` -- liveness and counts
/// - `POST /api/join_matchmaking` -- queue or pair a player
/// - `GET /api/find_game/{username}` -- reconnect by name
/// - `GET /api/game/{lobby_id}` -- series state
/// - `POST /api/game/{lobby_id}/move` -- play a cell
/// - `DELETE /api/lobby/{lobby_id}` -- remove a series
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route("/api/join_matchmaking", post(handlers::join_matchmaking))
        .route("/api/find_game/{username}", get(handlers::find_game))
        .route("/api/game/{lobby_id}", get(handlers::get_game))
        .route("/api/game/{lobby_id}/move", post(handlers::make_move))
        .route("/api/lobby/{lobby_id}", delete(handlers::delete_lobby))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
