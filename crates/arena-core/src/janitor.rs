//! Periodic retention sweep.
//!
//! The arena already sweeps lazily on every request. This task keeps
//! memory bounded while nobody is calling.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::arena::Arena;

/// Spawn a task that sweeps `arena` every `interval`.
///
/// The first sweep happens one full interval after the call. The task
/// runs until aborted or until the runtime shuts down. A zero interval, or
/// one too long to schedule, ends the task at once with a warning; the
/// lazy sweep on requests still applies.
pub fn spawn_janitor(arena: Arc<Arena>, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Janitor started");

    tokio::spawn(async move {
        let first = tokio::time::Instant::now().checked_add(interval);
        let Some(first) = first.filter(|_| !interval.is_zero()) else {
            warn!(
                interval_secs = interval.as_secs(),
                "Janitor interval cannot be scheduled; periodic sweeps disabled"
            );
            return;
        };

        let mut ticker = tokio::time::interval_at(first, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let evicted = arena.sweep().await;
            if evicted > 0 {
                info!(evicted, "Janitor sweep evicted stale series");
            } else {
                debug!("Janitor sweep found nothing to evict");
            }
        }
    })
}
