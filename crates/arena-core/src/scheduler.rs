//! Round scheduler: delayed, cancellable round advances.
//!
//! When a round ends the arena asks the scheduler to open the next one
//! after a short pause. Each request becomes a Tokio task keyed by series
//! ID. At most one task is pending per series; scheduling again replaces
//! (and aborts) the previous one. Deleting or evicting a series cancels
//! its task.
//!
//! Cancellation is best effort. The task's fire-time action is
//! [`MatchRegistry::advance`], which re-checks that the series still
//! exists and may still advance, so a task that slips past cancellation
//! cannot resurrect a deleted series or open a round twice.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use arena_types::SeriesId;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::registry::MatchRegistry;

#[derive(Debug)]
struct PendingAdvance {
    generation: u64,
    handle: JoinHandle<()>,
}

type PendingMap = Arc<Mutex<HashMap<SeriesId, PendingAdvance>>>;

/// Arms one-shot round advances.
#[derive(Debug)]
pub struct RoundScheduler {
    registry: Arc<MatchRegistry>,
    delay: Duration,
    pending: PendingMap,
    generation: AtomicU64,
}

impl RoundScheduler {
    /// Create a scheduler that advances series in `registry` after `delay`.
    pub fn new(registry: Arc<MatchRegistry>, delay: Duration) -> Self {
        Self {
            registry,
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    /// The configured inter-round delay.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Open the next round of `id` once the delay has elapsed.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule_advance(&self, id: SeriesId) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let registry = Arc::clone(&self.registry);
        let pending = Arc::clone(&self.pending);
        let delay = self.delay;

        // Hold the map lock across the spawn so the task cannot finish and
        // clear its slot before the slot is filled.
        let mut map = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if registry.advance(id).await {
                info!(lobby_id = %id, "Next round started");
            } else {
                debug!(lobby_id = %id, "Scheduled advance had nothing to do");
            }

            let mut map = pending.lock().unwrap_or_else(PoisonError::into_inner);
            if map.get(&id).is_some_and(|p| p.generation == generation) {
                map.remove(&id);
            }
        });

        if let Some(previous) = map.insert(id, PendingAdvance { generation, handle }) {
            previous.handle.abort();
        }
        debug!(lobby_id = %id, delay_ms = delay.as_millis(), "Round advance scheduled");
    }

    /// Cancel the pending advance for `id`. Returns `true` if one was
    /// pending.
    pub fn cancel(&self, id: SeriesId) -> bool {
        let removed = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        removed.is_some_and(|pending| {
            pending.handle.abort();
            debug!(lobby_id = %id, "Round advance cancelled");
            true
        })
    }

    /// Whether an advance is pending for `id`.
    pub fn is_pending(&self, id: SeriesId) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    /// Number of pending advances.
    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for RoundScheduler {
    fn drop(&mut self) {
        let mut map = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, pending) in map.drain() {
            pending.handle.abort();
        }
    }
}
