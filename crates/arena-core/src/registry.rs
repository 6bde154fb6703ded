//! The match registry: every live series, keyed by ID.
//!
//! The map itself sits behind a [`RwLock`] and each series behind its own
//! [`Mutex`]. Inserting, removing and sweeping take the write lock;
//! everything that touches a single series clones its handle under the
//! read lock and then locks only that series. Moves and round advances on
//! one series are therefore serialized while unrelated series proceed in
//! parallel.
//!
//! Seat names and creation time are copied into the registry entry so
//! lookups by name and retention sweeps never wait on a series lock.

use std::collections::HashMap;
use std::sync::Arc;

use arena_types::{Mark, PlayerId, SeriesId};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::series::{Seat, Series};

/// Shared handle to one series.
pub type SharedSeries = Arc<Mutex<Series>>;

#[derive(Debug)]
struct Entry {
    created_at: DateTime<Utc>,
    x: Seat,
    o: Seat,
    series: SharedSeries,
}

/// Where a display name is seated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatLookup {
    /// The series.
    pub lobby_id: SeriesId,
    /// The seat's mark.
    pub mark: Mark,
    /// The seat's player token.
    pub player_id: PlayerId,
    /// Display name of the other seat.
    pub opponent: String,
}

/// All series currently held in memory.
#[derive(Debug, Default)]
pub struct MatchRegistry {
    entries: RwLock<HashMap<SeriesId, Entry>>,
}

impl MatchRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly created series.
    pub async fn insert(&self, series: Series) -> SeriesId {
        let id = series.id();
        let entry = Entry {
            created_at: series.created_at(),
            x: series.x().clone(),
            o: series.o().clone(),
            series: Arc::new(Mutex::new(series)),
        };
        self.entries.write().await.insert(id, entry);
        id
    }

    /// Handle to the series, if it is still registered.
    pub async fn get(&self, id: SeriesId) -> Option<SharedSeries> {
        self.entries
            .read()
            .await
            .get(&id)
            .map(|entry| Arc::clone(&entry.series))
    }

    /// Whether the series is still registered.
    pub async fn contains(&self, id: SeriesId) -> bool {
        self.entries.read().await.contains_key(&id)
    }

    /// Remove a series. Returns `false` if it was not registered.
    pub async fn remove(&self, id: SeriesId) -> bool {
        self.entries.write().await.remove(&id).is_some()
    }

    /// Number of registered series.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remove every series created more than `retention` before `now`.
    ///
    /// Age is the only criterion: a series with a round in progress is
    /// evicted like any other. Returns the evicted IDs.
    pub async fn sweep(&self, now: DateTime<Utc>, retention: TimeDelta) -> Vec<SeriesId> {
        let mut entries = self.entries.write().await;
        let expired: Vec<SeriesId> = entries
            .iter()
            .filter(|(_, entry)| now.signed_duration_since(entry.created_at) > retention)
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            entries.remove(id);
        }
        expired
    }

    /// Find the seat held by `name`.
    ///
    /// The same name may sit in several series (one per pairing); the most
    /// recently created one wins.
    pub async fn find_seat(&self, name: &str) -> Option<SeatLookup> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter_map(|(id, entry)| {
                let (mark, seat, other) = if entry.x.name == name {
                    (Mark::X, &entry.x, &entry.o)
                } else if entry.o.name == name {
                    (Mark::O, &entry.o, &entry.x)
                } else {
                    return None;
                };
                Some((
                    entry.created_at,
                    SeatLookup {
                        lobby_id: *id,
                        mark,
                        player_id: seat.id,
                        opponent: other.name.clone(),
                    },
                ))
            })
            .max_by_key(|(created_at, _)| *created_at)
            .map(|(_, lookup)| lookup)
    }

    /// Open the next round of a series, if it is still registered.
    ///
    /// This is the round scheduler's fire-time action. It re-reads the
    /// series instead of trusting anything captured when the advance was
    /// scheduled: a removed series stays removed, and
    /// [`Series::advance_round`] refuses to skip an open round or pass the
    /// round cap.
    pub async fn advance(&self, id: SeriesId) -> bool {
        let Some(series) = self.get(id).await else {
            return false;
        };
        let mut series = series.lock().await;
        series.advance_round()
    }
}
