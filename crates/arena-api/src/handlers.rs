//! REST endpoint handlers for the arena.
//!
//! Each handler parses its inputs, makes one call on the shared
//! [`Arena`](arena_core::Arena) and serializes the result. Engine
//! rejections come back as [`ApiError`] and map to HTTP statuses there.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Service banner |
//! | `GET` | `/api/health` | Liveness plus lobby and queue counts |
//! | `POST` | `/api/join_matchmaking` | Queue a player, pair if possible |
//! | `GET` | `/api/find_game/{username}` | Reconnect by display name |
//! | `GET` | `/api/game/{lobby_id}` | Full series state |
//! | `POST` | `/api/game/{lobby_id}/move` | Play a cell |
//! | `DELETE` | `/api/lobby/{lobby_id}` | Remove a series |

use std::sync::Arc;

use arena_types::{DeleteResponse, JoinRequest, MoveRequest, SeriesId};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// Banner returned by `GET /`.
pub const BANNER: &str = "Tic-tac-toe arena API: matchmaking and automatic round series";

// ---------------------------------------------------------------------------
// GET / and GET /api/health
// ---------------------------------------------------------------------------

/// Service banner.
pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({ "message": BANNER }))
}

/// Liveness plus active lobby and queue counts. Sweeps stale state first.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.arena.health_snapshot().await)
}

// ---------------------------------------------------------------------------
// Matchmaking
// ---------------------------------------------------------------------------

/// Queue the caller and pair them with the oldest fresh waiter, if any.
pub async fn join_matchmaking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JoinRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let username = request.username.trim();
    if username.is_empty() {
        return Err(ApiError::InvalidRequest(String::from(
            "username must not be empty",
        )));
    }

    Ok(Json(state.arena.join_matchmaking(username).await?))
}

/// Look a display name up in the queue, then among live series.
pub async fn find_game(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    Json(state.arena.find_by_name(&username).await)
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Full state of one series.
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(lobby_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_lobby_id(&lobby_id)?;
    Ok(Json(state.arena.get_series(id).await?))
}

/// Play one cell in the active round.
///
/// A `lobby_id` in the body is optional; when present it must name the
/// same series as the path.
pub async fn make_move(
    State(state): State<Arc<AppState>>,
    Path(lobby_id): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_lobby_id(&lobby_id)?;
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    if let Some(body_id) = request.lobby_id
        && body_id != id
    {
        return Err(ApiError::InvalidRequest(format!(
            "body lobby_id {body_id} does not match path lobby_id {id}"
        )));
    }

    Ok(Json(
        state
            .arena
            .apply_move(id, request.player_id, request.cell)
            .await?,
    ))
}

/// Remove a series and cancel its pending round.
pub async fn delete_lobby(
    State(state): State<Arc<AppState>>,
    Path(lobby_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_lobby_id(&lobby_id)?;
    state.arena.delete_series(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_lobby_id(s: &str) -> Result<SeriesId, ApiError> {
    s.parse::<SeriesId>()
        .map_err(|e| ApiError::InvalidId(format!("{s}: {e}")))
}
