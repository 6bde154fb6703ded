//! Series (lobby) and round state machines.
//!
//! A [`Series`] owns every [`Round`] its two players have played. Only the
//! last round is ever active. A round goes from in-progress to concluded
//! exactly once, and nothing moves a series past a concluded round except
//! [`Series::advance_round`], which the round scheduler calls after the
//! inter-round delay.
//!
//! # Invariants
//!
//! - `current < rounds.len()` and `rounds.len() <= policy.max_rounds`.
//! - `score.get(m)` equals the number of rounds won by `m`.
//! - A rejected move leaves the series exactly as it was.

use arena_types::{Cell, Mark, MatchView, Outcome, PlayerId, Score, SeriesId, SeriesView};
use chrono::{DateTime, Utc};

use crate::board::{self, Board};
use crate::config::SeriesConfig;
use crate::error::ArenaError;

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    /// Player token issued at join time.
    pub id: PlayerId,
    /// Display name given at join time.
    pub name: String,
}

/// Round-count and draw policy captured when a series is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPolicy {
    /// Maximum number of rounds.
    pub max_rounds: usize,
    /// Whether a drawn round is followed by another.
    pub draws_advance: bool,
}

impl From<&SeriesConfig> for RoundPolicy {
    fn from(config: &SeriesConfig) -> Self {
        Self {
            max_rounds: config.max_rounds.max(1),
            draws_advance: config.draws_advance,
        }
    }
}

impl Default for RoundPolicy {
    fn default() -> Self {
        Self::from(&SeriesConfig::default())
    }
}

/// A single round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    board: Board,
    current_turn: PlayerId,
    winner: Option<Outcome>,
}

impl Round {
    /// A fresh round with `opener` to move.
    pub const fn new(opener: PlayerId) -> Self {
        Self {
            board: board::empty(),
            current_turn: opener,
            winner: None,
        }
    }

    /// The board.
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Player to move.
    pub const fn current_turn(&self) -> PlayerId {
        self.current_turn
    }

    /// The round's result, once it has one.
    pub const fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// Whether the round has ended.
    pub const fn is_concluded(&self) -> bool {
        self.winner.is_some()
    }

    fn view(&self) -> MatchView {
        MatchView {
            board: self.board,
            current_turn: self.current_turn,
            winner: self.winner,
        }
    }
}

/// What an accepted move did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// Mark that was placed.
    pub symbol: Mark,
    /// Cell that was taken.
    pub cell: u8,
    /// Board after the move.
    pub board: Board,
    /// Player to move next.
    pub current_turn: PlayerId,
    /// Round result if the move ended it.
    pub outcome: Option<Outcome>,
    /// Score after the move.
    pub score: Score,
    /// Winning line if the move won the round.
    pub winning_line: Option<[u8; 3]>,
    /// Whether another round should be scheduled.
    pub schedule_next: bool,
    /// Whether this move ended the final round.
    pub series_complete: bool,
}

/// Two players, their score, and every round they have played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    id: SeriesId,
    x: Seat,
    o: Seat,
    score: Score,
    rounds: Vec<Round>,
    current: usize,
    winning_line: Option<[u8; 3]>,
    created_at: DateTime<Utc>,
    policy: RoundPolicy,
}

impl Series {
    /// Seat `x` as `X` and `o` as `O` and open the first round.
    pub fn new(
        id: SeriesId,
        x: Seat,
        o: Seat,
        created_at: DateTime<Utc>,
        policy: RoundPolicy,
    ) -> Self {
        let opener = x.id;
        Self {
            id,
            x,
            o,
            score: Score::default(),
            rounds: vec![Round::new(opener)],
            current: 0,
            winning_line: None,
            created_at,
            policy,
        }
    }

    /// Series identifier.
    pub const fn id(&self) -> SeriesId {
        self.id
    }

    /// The `X` seat.
    pub const fn x(&self) -> &Seat {
        &self.x
    }

    /// The `O` seat.
    pub const fn o(&self) -> &Seat {
        &self.o
    }

    /// Cumulative score.
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Every round so far, oldest first.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Zero-based index of the active round.
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// The active round.
    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.get(self.current)
    }

    /// Cached winning line of the active round.
    pub const fn winning_line(&self) -> Option<[u8; 3]> {
        self.winning_line
    }

    /// Creation time.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Policy the series was created with.
    pub const fn policy(&self) -> RoundPolicy {
        self.policy
    }

    /// Mark held by `player`, if they are seated here.
    pub fn mark_of(&self, player: PlayerId) -> Option<Mark> {
        if player == self.x.id {
            Some(Mark::X)
        } else if player == self.o.id {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Seat holding `mark`.
    pub const fn seat(&self, mark: Mark) -> &Seat {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }

    /// Whether the final round has been played to a result.
    pub fn is_complete(&self) -> bool {
        self.rounds.len() >= self.policy.max_rounds
            && self.current_round().is_some_and(Round::is_concluded)
    }

    /// Whether a concluded round with this outcome should be followed by
    /// another one.
    fn wants_next_round(&self, outcome: Outcome) -> bool {
        self.rounds.len() < self.policy.max_rounds
            && (outcome != Outcome::Draw || self.policy.draws_advance)
    }

    /// Play `cell` for `player` in the active round.
    ///
    /// Checks run in this order: round still open, caller holds the turn,
    /// cell is free. A concluded round is reported as
    /// [`ArenaError::SeriesComplete`] when no further round will follow.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::SeriesComplete`],
    /// [`ArenaError::MatchAlreadyConcluded`], [`ArenaError::NotYourTurn`]
    /// or [`ArenaError::IllegalMove`]. On error nothing is modified.
    pub fn apply_move(&mut self, player: PlayerId, cell: i32) -> Result<MoveReport, ArenaError> {
        let complete = self.is_complete();
        let (id, current) = (self.id, self.current);
        let round = self
            .rounds
            .get(current)
            .ok_or(ArenaError::NotFound(id))?;

        if round.is_concluded() {
            return Err(if complete {
                ArenaError::SeriesComplete(id)
            } else {
                ArenaError::MatchAlreadyConcluded {
                    lobby_id: id,
                    round: current,
                }
            });
        }

        let mark = self
            .mark_of(player)
            .filter(|_| round.current_turn == player)
            .ok_or(ArenaError::NotYourTurn { player_id: player })?;

        let cell = board::cell_index(cell)?;
        let next_board = board::apply(&round.board, cell, mark)?;
        let outcome = board::evaluate(&next_board);
        let next_turn = self.seat(mark.other()).id;

        // Validation is done; everything below is infallible.
        self.winning_line = None;
        if let Some(winner) = outcome.and_then(Outcome::winner) {
            self.score.record_win(winner);
            self.winning_line = board::winning_triple(&next_board);
        }

        if let Some(round) = self.rounds.get_mut(current) {
            round.board = next_board;
            round.current_turn = next_turn;
            round.winner = outcome;
        }

        Ok(MoveReport {
            symbol: mark,
            cell,
            board: next_board,
            current_turn: next_turn,
            outcome,
            score: self.score,
            winning_line: self.winning_line,
            schedule_next: outcome.is_some_and(|o| self.wants_next_round(o)),
            series_complete: self.is_complete(),
        })
    }

    /// Open the next round.
    ///
    /// Does nothing and returns `false` unless the active round has
    /// concluded and the round cap has not been reached, so a repeated or
    /// late call cannot skip a round or overrun the cap.
    pub fn advance_round(&mut self) -> bool {
        let concluded = self.current_round().is_some_and(Round::is_concluded);
        if !concluded || self.rounds.len() >= self.policy.max_rounds {
            return false;
        }

        self.rounds.push(Round::new(self.x.id));
        self.current = self.rounds.len().saturating_sub(1);
        self.winning_line = None;
        true
    }

    /// Public view of the whole series.
    pub fn view(&self) -> SeriesView {
        SeriesView {
            lobby_id: self.id,
            player1: self.x.id,
            player1_name: self.x.name.clone(),
            player2: self.o.id,
            player2_name: self.o.name.clone(),
            score: self.score,
            current_game: self.current,
            games: self.rounds.iter().map(Round::view).collect(),
            winning_line: self.winning_line,
            created_at: self.created_at,
            series_complete: self.is_complete(),
        }
    }
}

/// Count of cells taken on a board, used by tests and logging.
pub fn moves_played(board: &Board) -> usize {
    board.iter().filter(|c| **c != Cell::Empty).count()
}
