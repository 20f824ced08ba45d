//! Shared, lazily-running statistics feed.
//!
//! # Responsibility
//! - Recompute `StatsSnapshot` on every entry snapshot while observed.
//! - Cache the last snapshot across short subscriber gaps.
//!
//! # Invariants
//! - At most one recompute task runs per feed.
//! - The task starts with the first subscriber and stops when the grace
//!   period after the last subscriber left ends with nobody subscribed.
//! - Entry changes are recomputed during the grace period too.
//! - Re-subscribing replays the cached snapshot before any recompute.

use crate::calendar::Calendar;
use crate::stats::aggregator::{aggregate, StatsSnapshot};
use crate::store::{EntrySnapshot, EntryStore, StoreError, StoreResult};
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// How long the feed keeps computing after its last subscriber leaves.
pub const DEFAULT_STATS_GRACE: Duration = Duration::from_secs(5);

/// Cloneable handle to the statistics feed.
#[derive(Clone)]
pub struct StatsFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    entries: watch::Receiver<EntrySnapshot>,
    stats_tx: watch::Sender<Arc<StatsSnapshot>>,
    calendar: Arc<dyn Calendar>,
    grace: Duration,
    running: Mutex<bool>,
}

impl StatsFeed {
    /// Creates an idle feed seeded with statistics for the current entries.
    pub fn new(store: &EntryStore, calendar: Arc<dyn Calendar>, grace: Duration) -> Self {
        let entries = store.subscribe_all();
        let initial = aggregate(&entries.borrow(), calendar.as_ref());
        let (stats_tx, _) = watch::channel(Arc::new(initial));
        Self {
            inner: Arc::new(FeedInner {
                entries,
                stats_tx,
                calendar,
                grace,
                running: Mutex::new(false),
            }),
        }
    }

    /// Subscribes to statistics, starting the recompute task if idle.
    ///
    /// # Errors
    /// - `StoreError::NoRuntime` when called outside a tokio runtime.
    pub fn subscribe(&self) -> StoreResult<StatsSubscription> {
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        let mut running = self.inner.lock_running();
        let rx = self.inner.stats_tx.subscribe();
        if !*running {
            *running = true;
            runtime.spawn(run_feed(Arc::clone(&self.inner)));
        }
        Ok(StatsSubscription { rx })
    }

    /// Last published snapshot, possibly stale while the feed is idle.
    pub fn latest(&self) -> Arc<StatsSnapshot> {
        self.inner.stats_tx.borrow().clone()
    }

    /// Whether the recompute task is currently running.
    pub fn is_active(&self) -> bool {
        *self.inner.lock_running()
    }
}

impl FeedInner {
    fn lock_running(&self) -> MutexGuard<'_, bool> {
        // The flag stays meaningful even if a holder panicked.
        self.running
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, entries: &EntrySnapshot) {
        let stats = aggregate(entries, self.calendar.as_ref());
        let changed = self.stats_tx.send_if_modified(|current| {
            if **current == stats {
                return false;
            }
            *current = Arc::new(stats);
            true
        });
        debug!("event=stats_recompute module=stats status=ok changed={changed}");
    }

    /// Marks the feed idle if nobody subscribed during the grace period.
    fn try_release(&self) -> bool {
        let mut running = self.lock_running();
        if self.stats_tx.receiver_count() == 0 {
            *running = false;
            return true;
        }
        false
    }
}

async fn run_feed(inner: Arc<FeedInner>) {
    info!("event=stats_feed module=stats status=start");
    let mut entries = inner.entries.clone();
    let current = entries.borrow_and_update().clone();
    inner.publish(&current);

    loop {
        tokio::select! {
            changed = entries.changed() => {
                if changed.is_err() {
                    *inner.lock_running() = false;
                    info!("event=stats_feed module=stats status=stop reason=store_closed");
                    return;
                }
                let snapshot = entries.borrow_and_update().clone();
                inner.publish(&snapshot);
            }
            () = inner.stats_tx.closed() => {
                match wait_out_grace(&inner, &mut entries).await {
                    GraceEnd::Observed => {}
                    GraceEnd::Released => {
                        info!("event=stats_feed module=stats status=stop reason=idle");
                        return;
                    }
                    GraceEnd::StoreClosed => {
                        info!("event=stats_feed module=stats status=stop reason=store_closed");
                        return;
                    }
                }
            }
        }
    }
}

enum GraceEnd {
    Observed,
    Released,
    StoreClosed,
}

/// Keeps recomputing until the grace deadline, then releases if unobserved.
async fn wait_out_grace(
    inner: &FeedInner,
    entries: &mut watch::Receiver<EntrySnapshot>,
) -> GraceEnd {
    let deadline = tokio::time::sleep(inner.grace);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            () = &mut deadline => {
                return if inner.try_release() {
                    GraceEnd::Released
                } else {
                    GraceEnd::Observed
                };
            }
            changed = entries.changed() => {
                if changed.is_err() {
                    *inner.lock_running() = false;
                    return GraceEnd::StoreClosed;
                }
                let snapshot = entries.borrow_and_update().clone();
                inner.publish(&snapshot);
            }
        }
    }
}

/// Receiver side of the statistics feed.
pub struct StatsSubscription {
    rx: watch::Receiver<Arc<StatsSnapshot>>,
}

impl StatsSubscription {
    /// Latest snapshot, available immediately on subscription.
    pub fn current(&mut self) -> Arc<StatsSnapshot> {
        self.rx.borrow_and_update().clone()
    }

    /// Waits for the next recomputed snapshot.
    ///
    /// Returns `None` once the feed has shut down.
    pub async fn next(&mut self) -> Option<Arc<StatsSnapshot>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
