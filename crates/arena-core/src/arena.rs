//! The arena: matchmaking and series lifecycle behind one handle.
//!
//! [`Arena`] owns the match registry, the matchmaking queue, the round
//! scheduler and the clock. The HTTP layer holds it in an [`Arc`] and calls
//! one method per request; every method completes in memory without
//! blocking on I/O.
//!
//! # Locking
//!
//! The queue mutex is always taken before the registry lock. A join holds
//! the queue mutex until the new series is registered, so a pair is never
//! visible as "neither queued nor seated".
//!
//! # Retention
//!
//! Every read and write except deletion sweeps the registry first, the way
//! the health endpoint does. The periodic [`janitor`](crate::janitor) task
//! covers idle periods.

use std::sync::Arc;

use arena_types::{
    FindResponse, HealthResponse, JoinResponse, Mark, MoveResponse, PlayerId, SeriesId,
    SeriesView,
};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::{ArenaConfig, SeriesConfig};
use crate::error::ArenaError;
use crate::queue::{Enqueued, MatchmakingQueue, QueuedPlayer};
use crate::registry::MatchRegistry;
use crate::scheduler::RoundScheduler;
use crate::series::{RoundPolicy, Seat, Series, moves_played};

/// Matchmaking queue, series registry and round scheduler.
#[derive(Debug)]
pub struct Arena {
    registry: Arc<MatchRegistry>,
    queue: Mutex<MatchmakingQueue>,
    scheduler: RoundScheduler,
    clock: Arc<dyn Clock>,
    series_config: SeriesConfig,
}

impl Arena {
    /// Create an arena driven by the system clock.
    pub fn new(config: &ArenaConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an arena driven by `clock`.
    pub fn with_clock(config: &ArenaConfig, clock: Arc<dyn Clock>) -> Self {
        let registry = Arc::new(MatchRegistry::new());
        let scheduler =
            RoundScheduler::new(Arc::clone(&registry), config.series.next_round_delay());
        let queue = MatchmakingQueue::new(
            config.matchmaking.queue_ttl(),
            config.matchmaking.duplicate_join,
        );

        Self {
            registry,
            queue: Mutex::new(queue),
            scheduler,
            clock,
            series_config: config.series.clone(),
        }
    }

    /// The registry backing this arena.
    pub const fn registry(&self) -> &Arc<MatchRegistry> {
        &self.registry
    }

    /// The round scheduler.
    pub const fn scheduler(&self) -> &RoundScheduler {
        &self.scheduler
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // -----------------------------------------------------------------------
    // Matchmaking
    // -----------------------------------------------------------------------

    /// Queue `username` for a game.
    ///
    /// Issues a fresh player token, then either reports the queue depth or,
    /// if an opponent was waiting, creates the series and reports the
    /// caller's seat.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::AlreadyQueued`] if the name is already waiting
    /// and duplicate joins are rejected.
    pub async fn join_matchmaking(&self, username: &str) -> Result<JoinResponse, ArenaError> {
        self.sweep().await;

        let now = self.now();
        let player_id = PlayerId::new();
        let player = QueuedPlayer {
            id: player_id,
            name: username.to_owned(),
            joined_at: now,
        };

        let mut queue = self.queue.lock().await;
        match queue.enqueue(player, now)? {
            Enqueued::Waiting { depth } | Enqueued::Merged { depth } => {
                Ok(JoinResponse::Waiting {
                    player_id,
                    players_in_queue: depth,
                })
            }
            Enqueued::Paired(first, second) => {
                // At most one player ever waits, so the caller is the
                // second of the pair and plays O.
                let opponent = first.name.clone();
                let lobby_id = self.create_series(first, second).await;
                drop(queue);
                Ok(JoinResponse::Found {
                    player_id,
                    lobby_id,
                    opponent,
                    you_are: Mark::O,
                })
            }
        }
    }

    /// Seat `x` as `X`, `o` as `O` and register the new series.
    async fn create_series(&self, x: QueuedPlayer, o: QueuedPlayer) -> SeriesId {
        let id = SeriesId::new();
        info!(lobby_id = %id, x = %x.name, o = %o.name, "Series created");

        let x = Seat {
            id: x.id,
            name: x.name,
        };
        let o = Seat {
            id: o.id,
            name: o.name,
        };
        let series = Series::new(id, x, o, self.now(), RoundPolicy::from(&self.series_config));
        self.registry.insert(series).await;
        id
    }

    /// Look a display name up for reconnection.
    ///
    /// The queue is checked first, then the registry.
    pub async fn find_by_name(&self, username: &str) -> FindResponse {
        self.sweep().await;

        let now = self.now();
        let mut queue = self.queue.lock().await;
        queue.prune(now);
        if queue.contains(username) {
            return FindResponse::Waiting {
                players_in_queue: queue.len(),
            };
        }

        match self.registry.find_seat(username).await {
            Some(seat) => FindResponse::Found {
                lobby_id: seat.lobby_id,
                opponent: seat.opponent,
                you_are: seat.mark,
                player_id: seat.player_id,
            },
            None => FindResponse::NotFound,
        }
    }

    // -----------------------------------------------------------------------
    // Series
    // -----------------------------------------------------------------------

    /// Current state of a series.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::NotFound`] if the series is not registered.
    pub async fn get_series(&self, id: SeriesId) -> Result<SeriesView, ArenaError> {
        self.sweep().await;

        let series = self.registry.get(id).await.ok_or(ArenaError::NotFound(id))?;
        let view = series.lock().await.view();
        Ok(view)
    }

    /// Play `cell` for `player_id` in the active round of series `id`.
    ///
    /// When the move ends a round that should be followed by another, the
    /// next round is scheduled and the response carries the delay.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::NotFound`], [`ArenaError::SeriesComplete`],
    /// [`ArenaError::MatchAlreadyConcluded`], [`ArenaError::NotYourTurn`]
    /// or [`ArenaError::IllegalMove`]. A rejected move changes nothing.
    pub async fn apply_move(
        &self,
        id: SeriesId,
        player_id: PlayerId,
        cell: i32,
    ) -> Result<MoveResponse, ArenaError> {
        self.sweep().await;

        let series = self.registry.get(id).await.ok_or(ArenaError::NotFound(id))?;
        let mut series = series.lock().await;
        let report = series.apply_move(player_id, cell)?;
        let round = series.current_index();

        debug!(
            lobby_id = %id,
            player_id = %player_id,
            cell,
            round,
            moves = moves_played(&report.board),
            "Move accepted"
        );

        let mut new_game_in_ms = None;
        if let Some(outcome) = report.outcome {
            info!(
                lobby_id = %id,
                round,
                winner = ?outcome,
                score_x = report.score.get(Mark::X),
                score_o = report.score.get(Mark::O),
                series_complete = report.series_complete,
                "Round concluded"
            );

            // Scheduled while the series lock is held; the advance cannot
            // run before this move is fully applied.
            if report.schedule_next {
                self.scheduler.schedule_advance(id);
                new_game_in_ms =
                    Some(u64::try_from(self.scheduler.delay().as_millis()).unwrap_or(u64::MAX));
            }
        }
        drop(series);

        Ok(MoveResponse {
            success: true,
            symbol: report.symbol,
            cell: report.cell,
            board: report.board,
            current_turn: report.current_turn,
            winner: report.outcome,
            game_ended: report.outcome.is_some(),
            final_score: report.score,
            winning_line: report.winning_line,
            series_complete: report.series_complete,
            new_game_in_ms,
        })
    }

    /// Remove a series and cancel its pending round advance.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::NotFound`] if the series is not registered.
    pub async fn delete_series(&self, id: SeriesId) -> Result<(), ArenaError> {
        if !self.registry.remove(id).await {
            return Err(ArenaError::NotFound(id));
        }
        self.scheduler.cancel(id);
        info!(lobby_id = %id, "Series deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Retention and health
    // -----------------------------------------------------------------------

    /// Evict series past the retention window and cancel their advances.
    ///
    /// Returns the number of evicted series.
    pub async fn sweep(&self) -> usize {
        let evicted = self
            .registry
            .sweep(self.now(), self.series_config.retention())
            .await;

        for id in &evicted {
            self.scheduler.cancel(*id);
            info!(lobby_id = %id, "Series evicted after retention window");
        }
        evicted.len()
    }

    /// Sweep, then report registry size and queue depth.
    pub async fn health_snapshot(&self) -> HealthResponse {
        self.sweep().await;

        let now = self.now();
        let players_in_queue = {
            let mut queue = self.queue.lock().await;
            queue.prune(now);
            queue.len()
        };

        HealthResponse {
            status: "alive".to_owned(),
            active_lobbies: self.registry.len().await,
            players_in_queue,
            timestamp: now,
        }
    }
}
