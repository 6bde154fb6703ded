//! Public views of series state.
//!
//! These are the plain-data projections returned by `GET /api/game/{id}`.
//! The engine keeps its own internal representation and builds a view on
//! every read, so clients never observe a half-applied move.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Cell, Mark, Outcome};
use crate::ids::{PlayerId, SeriesId};

/// Cumulative series score, one counter per mark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Score {
    /// Rounds won by the `X` seat.
    #[serde(rename = "X")]
    pub x: u32,
    /// Rounds won by the `O` seat.
    #[serde(rename = "O")]
    pub o: u32,
}

impl Score {
    /// Rounds won by `mark`.
    pub const fn get(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// Credit one round to `mark`.
    pub const fn record_win(&mut self, mark: Mark) {
        match mark {
            Mark::X => self.x = self.x.saturating_add(1),
            Mark::O => self.o = self.o.saturating_add(1),
        }
    }
}

/// One round as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MatchView {
    /// Cells in row-major order (index 0 is top-left, 8 is bottom-right).
    pub board: [Cell; 9],
    /// Player whose move it is. After the round ends this is the player
    /// who would have moved next.
    pub current_turn: PlayerId,
    /// Result of the round, `None` while it is still being played.
    pub winner: Option<Outcome>,
}

/// A full series (lobby) as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SeriesView {
    /// Series identifier.
    pub lobby_id: SeriesId,
    /// Player holding the `X` seat.
    pub player1: PlayerId,
    /// Display name of the `X` seat.
    pub player1_name: String,
    /// Player holding the `O` seat.
    pub player2: PlayerId,
    /// Display name of the `O` seat.
    pub player2_name: String,
    /// Rounds won so far by each mark.
    pub score: Score,
    /// Index into `games` of the active round.
    pub current_game: usize,
    /// Every round played so far, oldest first.
    pub games: Vec<MatchView>,
    /// Cells of the line that won the active round, if it was won.
    pub winning_line: Option<[u8; 3]>,
    /// When the two players were paired.
    pub created_at: DateTime<Utc>,
    /// Whether the final round has been played to a result.
    pub series_complete: bool,
}

impl SeriesView {
    /// The active round.
    pub fn current(&self) -> Option<&MatchView> {
        self.games.get(self.current_game)
    }
}
