//! Request and response payloads exchanged with clients.
//!
//! Responses carrying a `status` field are internally tagged enums so the
//! optional fields of each status are present exactly when they apply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Cell, Mark, Outcome};
use crate::ids::{PlayerId, SeriesId};
use crate::structs::Score;

/// Body of `POST /api/join_matchmaking`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct JoinRequest {
    /// Display name to queue under.
    pub username: String,
}

/// Body of `POST /api/game/{lobby_id}/move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MoveRequest {
    /// Older clients repeat the lobby ID in the body. When present it must
    /// match the path.
    #[serde(default)]
    pub lobby_id: Option<SeriesId>,
    /// Token of the player making the move.
    pub player_id: PlayerId,
    /// Target cell, 0 to 8 in row-major order. Decoded wide so that
    /// off-board values reach the engine and are refused as illegal moves.
    pub cell: i32,
}

/// Result of joining matchmaking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum JoinResponse {
    /// No opponent yet.
    Waiting {
        /// Token issued for this join.
        player_id: PlayerId,
        /// Queue depth after this join.
        players_in_queue: usize,
    },
    /// The caller was paired into a new series.
    Found {
        /// Token issued for this join.
        player_id: PlayerId,
        /// The new series.
        lobby_id: SeriesId,
        /// Display name of the other seat.
        opponent: String,
        /// The caller's mark.
        you_are: Mark,
    },
}

/// Result of looking a display name up for reconnection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FindResponse {
    /// The name is still in the matchmaking queue.
    Waiting {
        /// Current queue depth.
        players_in_queue: usize,
    },
    /// The name holds a seat in a live series.
    Found {
        /// The series.
        lobby_id: SeriesId,
        /// Display name of the other seat.
        opponent: String,
        /// The seat's mark.
        you_are: Mark,
        /// The seat's player token.
        player_id: PlayerId,
    },
    /// Neither queued nor seated.
    NotFound,
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MoveResponse {
    /// Always `true`; rejected moves are reported as errors.
    pub success: bool,
    /// Mark that was placed.
    pub symbol: Mark,
    /// Cell that was taken.
    pub cell: u8,
    /// Board after the move.
    pub board: [Cell; 9],
    /// Player to move next.
    pub current_turn: PlayerId,
    /// Result of the round if this move ended it.
    pub winner: Option<Outcome>,
    /// Whether this move ended the round.
    pub game_ended: bool,
    /// Series score after the move.
    pub final_score: Score,
    /// Winning cells if this move won the round.
    pub winning_line: Option<[u8; 3]>,
    /// Whether this move ended the final round of the series.
    pub series_complete: bool,
    /// Delay before the next round starts, when one has been scheduled.
    pub new_game_in_ms: Option<u64>,
}

/// Liveness report, also used as the janitor trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HealthResponse {
    /// Always `"alive"`.
    pub status: String,
    /// Series still in the registry after the sweep.
    pub active_lobbies: usize,
    /// Fresh entries in the matchmaking queue.
    pub players_in_queue: usize,
    /// Server time of the snapshot.
    pub timestamp: DateTime<Utc>,
}

/// Result of deleting a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DeleteResponse {
    /// Always `true`; unknown series are reported as errors.
    pub success: bool,
}
