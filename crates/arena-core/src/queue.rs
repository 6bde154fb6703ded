//! The matchmaking queue.
//!
//! A FIFO of anonymous players waiting for an opponent. Entries go stale
//! after the queue TTL and are dropped on the next access. As soon as two
//! fresh entries are present the two oldest are handed back as a pair.
//!
//! The queue is a plain data structure with no locking of its own; the
//! [`Arena`](crate::arena::Arena) keeps it behind a mutex and holds that
//! mutex until a pair has been registered as a series.

use std::collections::VecDeque;

use arena_types::PlayerId;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::config::DuplicateJoinPolicy;
use crate::error::ArenaError;

/// A player waiting for an opponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPlayer {
    /// Token issued for this join.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// When the player joined.
    pub joined_at: DateTime<Utc>,
}

/// What happened to a join request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enqueued {
    /// The player is waiting. `depth` is the queue length afterwards.
    Waiting {
        /// Queue length after the join.
        depth: usize,
    },
    /// The name was already waiting and the merge policy applied; no new
    /// entry was added.
    Merged {
        /// Queue length (unchanged).
        depth: usize,
    },
    /// The two oldest entries were removed as a pair. The first element
    /// joined first.
    Paired(QueuedPlayer, QueuedPlayer),
}

/// FIFO of players waiting to be paired.
#[derive(Debug)]
pub struct MatchmakingQueue {
    waiting: VecDeque<QueuedPlayer>,
    ttl: TimeDelta,
    duplicates: DuplicateJoinPolicy,
}

impl MatchmakingQueue {
    /// Create an empty queue.
    pub const fn new(ttl: TimeDelta, duplicates: DuplicateJoinPolicy) -> Self {
        Self {
            waiting: VecDeque::new(),
            ttl,
            duplicates,
        }
    }

    /// Drop entries that joined `ttl` or more before `now`.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.waiting.len();
        let ttl = self.ttl;
        self.waiting
            .retain(|p| now.signed_duration_since(p.joined_at) < ttl);
        let dropped = before.saturating_sub(self.waiting.len());
        if dropped > 0 {
            debug!(dropped, remaining = self.waiting.len(), "Dropped stale queue entries");
        }
        dropped
    }

    /// Add a player, pairing the two oldest entries if possible.
    ///
    /// Stale entries are pruned first, so an old entry under the same name
    /// does not count as a duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::AlreadyQueued`] if `player.name` is already
    /// waiting and the policy is [`DuplicateJoinPolicy::Reject`].
    pub fn enqueue(
        &mut self,
        player: QueuedPlayer,
        now: DateTime<Utc>,
    ) -> Result<Enqueued, ArenaError> {
        self.prune(now);

        if self.contains(&player.name) {
            return match self.duplicates {
                DuplicateJoinPolicy::Reject => Err(ArenaError::AlreadyQueued {
                    username: player.name,
                }),
                DuplicateJoinPolicy::Merge => Ok(Enqueued::Merged {
                    depth: self.waiting.len(),
                }),
            };
        }

        debug!(player_id = %player.id, username = %player.name, "Player queued");
        self.waiting.push_back(player);

        if self.waiting.len() >= 2
            && let (Some(first), Some(second)) =
                (self.waiting.pop_front(), self.waiting.pop_front())
        {
            return Ok(Enqueued::Paired(first, second));
        }

        Ok(Enqueued::Waiting {
            depth: self.waiting.len(),
        })
    }

    /// Whether a player with this display name is waiting.
    pub fn contains(&self, name: &str) -> bool {
        self.waiting.iter().any(|p| p.name == name)
    }

    /// Number of waiting players.
    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    /// Whether nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
