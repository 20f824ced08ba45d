//! Entry store implementation over a shared SQLite connection.

use crate::calendar::{Calendar, MonthDay};
use crate::db::SharedConnection;
use crate::model::entry::{EntryId, JournalEntry};
use crate::repo::entry_repo::{EntryRepository, SqliteEntryRepository};
use crate::repo::RepoResult;
use crate::store::{StoreError, StoreResult};
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Immutable newest-first view of every entry at one point in time.
pub type EntrySnapshot = Arc<Vec<JournalEntry>>;

/// Cloneable handle to the journal entry store.
#[derive(Clone)]
pub struct EntryStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    conn: SharedConnection,
    snapshot_tx: watch::Sender<EntrySnapshot>,
}

impl EntryStore {
    /// Loads the current entries and starts publishing snapshots.
    pub fn open(conn: SharedConnection) -> StoreResult<Self> {
        let entries = {
            let guard = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            SqliteEntryRepository::new(&guard).list_entries()?
        };
        info!(
            "event=store_open module=store status=ok entries={}",
            entries.len()
        );
        let (snapshot_tx, _) = watch::channel(Arc::new(entries));
        Ok(Self {
            inner: Arc::new(StoreInner { conn, snapshot_tx }),
        })
    }

    /// Persists `entry`; `id == 0` assigns a new id, otherwise replaces.
    pub async fn insert(&self, entry: JournalEntry) -> StoreResult<EntryId> {
        self.write("insert", move |repo| repo.insert_entry(&entry))
            .await
    }

    /// Replaces the entry with the same id.
    ///
    /// Returns `Ok(false)` without publishing when the id does not exist.
    pub async fn update(&self, entry: JournalEntry) -> StoreResult<bool> {
        self.write("update", move |repo| repo.update_entry(&entry))
            .await
    }

    /// Returns `Ok(false)` when the id does not exist.
    pub async fn delete(&self, id: EntryId) -> StoreResult<bool> {
        self.write("delete", move |repo| repo.delete_entry(id)).await
    }

    /// Removes every entry; returns the number of deleted rows.
    pub async fn delete_all(&self) -> StoreResult<usize> {
        self.write("delete_all", |repo| repo.delete_all()).await
    }

    /// Subscribes to full snapshots; the current one is readable right away.
    pub fn subscribe_all(&self) -> watch::Receiver<EntrySnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Subscribes to one entry by id.
    pub fn subscribe_entry(&self, id: EntryId) -> EntrySubscription {
        let mut rx = self.inner.snapshot_tx.subscribe();
        let last = find_entry(&rx.borrow_and_update(), id);
        EntrySubscription { id, rx, last }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> EntrySnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    pub fn get(&self, id: EntryId) -> Option<JournalEntry> {
        find_entry(&self.snapshot(), id)
    }

    /// Entries from the latest snapshot written on `month_day` of any year.
    pub fn on_this_day(&self, month_day: MonthDay, calendar: &dyn Calendar) -> Vec<JournalEntry> {
        self.snapshot()
            .iter()
            .filter(|entry| month_day.matches(calendar.local_date(entry.created_at)))
            .cloned()
            .collect()
    }

    async fn write<T, F>(&self, op: &'static str, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteEntryRepository<'_>) -> RepoResult<T> + Send + 'static,
    {
        let started_at = Instant::now();
        let inner = Arc::clone(&self.inner);
        let result = match tokio::task::spawn_blocking(move || inner.write_and_publish(f)).await {
            Ok(result) => result,
            Err(err) => Err(StoreError::from(err)),
        };

        match &result {
            Ok(_) => info!(
                "event=entry_write module=store status=ok op={op} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=entry_write module=store status=error op={op} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

impl StoreInner {
    fn write_and_publish<T>(
        &self,
        f: impl FnOnce(&SqliteEntryRepository<'_>) -> RepoResult<T>,
    ) -> StoreResult<T> {
        let guard = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let repo = SqliteEntryRepository::new(&guard);
        let value = f(&repo)?;
        let entries = repo.list_entries()?;

        // Published under the connection lock so snapshot order equals write order.
        self.snapshot_tx.send_if_modified(|current| {
            if current.as_slice() == entries.as_slice() {
                return false;
            }
            *current = Arc::new(entries);
            true
        });
        Ok(value)
    }
}

/// Continuously-updating view of a single entry.
pub struct EntrySubscription {
    id: EntryId,
    rx: watch::Receiver<EntrySnapshot>,
    last: Option<JournalEntry>,
}

impl EntrySubscription {
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Last value emitted to this subscriber; `None` when absent.
    pub fn current(&self) -> Option<&JournalEntry> {
        self.last.as_ref()
    }

    /// Waits until the entry differs from the last emitted value.
    ///
    /// Deletion is emitted as `Ok(None)`.
    ///
    /// # Errors
    /// - `StoreError::Closed` once every store handle has been dropped.
    pub async fn next(&mut self) -> StoreResult<Option<JournalEntry>> {
        loop {
            self.rx.changed().await.map_err(|_| StoreError::Closed)?;
            let projected = find_entry(&self.rx.borrow_and_update(), self.id);
            if projected != self.last {
                self.last = projected.clone();
                return Ok(projected);
            }
        }
    }
}

fn find_entry(entries: &[JournalEntry], id: EntryId) -> Option<JournalEntry> {
    entries.iter().find(|entry| entry.id == id).cloned()
}
