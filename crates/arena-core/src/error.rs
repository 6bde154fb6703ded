//! Error types for arena operations.
//!
//! Every variant is a rejected request, not a failure of the engine: the
//! caller gets the error back and no state has changed.

use arena_types::{PlayerId, SeriesId};

/// Why a cell cannot be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    /// The cell already holds a mark.
    #[error("already taken")]
    Occupied,
    /// The index is not in `0..9`.
    #[error("off the board")]
    OutOfRange,
}

/// Errors returned by [`Arena`](crate::arena::Arena) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    /// No series with this ID is in the registry.
    #[error("lobby not found: {0}")]
    NotFound(SeriesId),

    /// The player does not hold the turn in the active round.
    #[error("not your turn: player {player_id}")]
    NotYourTurn {
        /// The player that tried to move.
        player_id: PlayerId,
    },

    /// The target cell cannot be played.
    #[error("illegal move: cell {cell} is {reason}")]
    IllegalMove {
        /// The requested cell, as sent by the client.
        cell: i32,
        /// Why the cell was refused.
        reason: MoveRejection,
    },

    /// The active round is over and the next one has not started yet.
    #[error("round {round} of lobby {lobby_id} is already over")]
    MatchAlreadyConcluded {
        /// The series.
        lobby_id: SeriesId,
        /// Zero-based index of the concluded round.
        round: usize,
    },

    /// Every round of the series has been played.
    #[error("lobby {0} has played its final round")]
    SeriesComplete(SeriesId),

    /// The display name is already waiting in the matchmaking queue.
    #[error("{username} is already waiting for an opponent")]
    AlreadyQueued {
        /// The duplicate display name.
        username: String,
    },
}
