//! JSON journal export.
//!
//! # Responsibility
//! - Stream every entry into one JSON document with per-entry progress.
//!
//! # Invariants
//! - Entries are written in the order given (newest first from the store).
//! - Progress is reported in `(0, 1]`, ending at exactly `1.0`.
//! - An empty journal is an error, never an empty file.

use crate::calendar::Calendar;
use crate::model::entry::JournalEntry;
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    NothingToExport,
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingToExport => write!(f, "no entries to export"),
            Self::Io(err) => write!(f, "export write failed: {err}"),
            Self::Json(err) => write!(f, "export encoding failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NothingToExport => None,
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Result metadata of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub exported_at: i64,
    pub entry_count: usize,
}

#[derive(Serialize)]
struct ExportedEntry<'a> {
    #[serde(flatten)]
    entry: &'a JournalEntry,
    /// Local calendar date, `YYYY-MM-DD`.
    date: String,
}

/// Writes `{ "exported_at", "user_name", "entries": [...] }` to `writer`.
///
/// `on_progress` is called once per written entry with the completed fraction.
pub fn export_entries_json<W, P>(
    entries: &[JournalEntry],
    user_name: &str,
    calendar: &dyn Calendar,
    mut writer: W,
    mut on_progress: P,
) -> ExportResult<ExportSummary>
where
    W: Write,
    P: FnMut(f32),
{
    if entries.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let exported_at = calendar.now_ms();
    writer.write_all(b"{\"exported_at\":")?;
    serde_json::to_writer(&mut writer, &exported_at)?;
    writer.write_all(b",\"user_name\":")?;
    serde_json::to_writer(&mut writer, user_name)?;
    writer.write_all(b",\"entries\":[")?;

    let total = entries.len();
    for (index, entry) in entries.iter().enumerate() {
        if index > 0 {
            writer.write_all(b",")?;
        }
        let exported = ExportedEntry {
            entry,
            date: calendar.local_date(entry.created_at).to_string(),
        };
        serde_json::to_writer(&mut writer, &exported)?;
        on_progress((index + 1) as f32 / total as f32);
    }

    writer.write_all(b"]}")?;
    writer.flush()?;
    info!(
        "event=export_json module=export status=ok entries={}",
        total
    );
    Ok(ExportSummary {
        exported_at,
        entry_count: total,
    })
}
