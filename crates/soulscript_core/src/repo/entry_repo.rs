//! Journal entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `entries` table.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Write paths call `JournalEntry::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing order is `created_at DESC, id DESC` (newest first).
//! - `created_at` is never rewritten by `update_entry`.

use crate::calendar::{Calendar, MonthDay};
use crate::model::entry::{EntryId, JournalEntry};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    created_at,
    mood,
    is_important,
    image_uri,
    sketch_path,
    audio_path
FROM entries";

/// Repository interface for journal entry persistence.
pub trait EntryRepository {
    /// Inserts a new entry (`id == 0`) or replaces the row with the same id.
    ///
    /// Returns the id of the stored row.
    fn insert_entry(&self, entry: &JournalEntry) -> RepoResult<EntryId>;
    /// Replaces every mutable column of the row matching `entry.id`.
    ///
    /// Returns `false` when no such row exists.
    fn update_entry(&self, entry: &JournalEntry) -> RepoResult<bool>;
    /// Returns `false` when no such row exists.
    fn delete_entry(&self, id: EntryId) -> RepoResult<bool>;
    /// Removes every entry and returns how many rows were deleted.
    fn delete_all(&self) -> RepoResult<usize>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<JournalEntry>>;
    /// Lists all entries, newest first.
    fn list_entries(&self) -> RepoResult<Vec<JournalEntry>>;
    /// Lists entries written on `month_day` of any year, newest first.
    ///
    /// Dates are resolved in `calendar`'s local timezone, so Feb 29 entries
    /// only match Feb 29.
    fn list_on_this_day(
        &self,
        month_day: MonthDay,
        calendar: &dyn Calendar,
    ) -> RepoResult<Vec<JournalEntry>>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn insert_entry(&self, entry: &JournalEntry) -> RepoResult<EntryId> {
        entry.validate()?;

        if entry.is_persisted() {
            self.conn.execute(
                "INSERT OR REPLACE INTO entries (
                    id,
                    title,
                    content,
                    created_at,
                    mood,
                    is_important,
                    image_uri,
                    sketch_path,
                    audio_path
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
                params![
                    entry.id,
                    entry.title.as_str(),
                    entry.content.as_str(),
                    entry.created_at,
                    entry.mood.as_str(),
                    entry.is_important,
                    entry.image_uri.as_deref(),
                    entry.sketch_path.as_deref(),
                    entry.audio_path.as_deref(),
                ],
            )?;
            return Ok(entry.id);
        }

        self.conn.execute(
            "INSERT INTO entries (
                title,
                content,
                created_at,
                mood,
                is_important,
                image_uri,
                sketch_path,
                audio_path
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                entry.title.as_str(),
                entry.content.as_str(),
                entry.created_at,
                entry.mood.as_str(),
                entry.is_important,
                entry.image_uri.as_deref(),
                entry.sketch_path.as_deref(),
                entry.audio_path.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_entry(&self, entry: &JournalEntry) -> RepoResult<bool> {
        entry.validate()?;

        let changed = self.conn.execute(
            "UPDATE entries
             SET
                title = ?1,
                content = ?2,
                mood = ?3,
                is_important = ?4,
                image_uri = ?5,
                sketch_path = ?6,
                audio_path = ?7
             WHERE id = ?8;",
            params![
                entry.title.as_str(),
                entry.content.as_str(),
                entry.mood.as_str(),
                entry.is_important,
                entry.image_uri.as_deref(),
                entry.sketch_path.as_deref(),
                entry.audio_path.as_deref(),
                entry.id,
            ],
        )?;

        Ok(changed > 0)
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn delete_all(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM entries;", [])?)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<JournalEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn list_entries(&self) -> RepoResult<Vec<JournalEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn list_on_this_day(
        &self,
        month_day: MonthDay,
        calendar: &dyn Calendar,
    ) -> RepoResult<Vec<JournalEntry>> {
        let mut entries = self.list_entries()?;
        entries.retain(|entry| month_day.matches(calendar.local_date(entry.created_at)));
        Ok(entries)
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<JournalEntry> {
    let is_important = match row.get::<_, i64>("is_important")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_important value `{other}` in entries.is_important"
            )));
        }
    };

    let entry = JournalEntry {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        mood: row.get("mood")?,
        is_important,
        image_uri: row.get("image_uri")?,
        sketch_path: row.get("sketch_path")?,
        audio_path: row.get("audio_path")?,
    };
    entry
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("entry {}: {err}", entry.id)))?;
    Ok(entry)
}
