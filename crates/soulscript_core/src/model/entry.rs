//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the canonical diary record persisted by the entry repository.
//! - Provide validation applied by every write and read path.
//!
//! # Invariants
//! - `id == 0` means "not yet assigned"; storage assigns a positive id.
//! - `created_at` is fixed at creation and never rewritten by updates.
//! - Optional attachment paths are either `None` or non-blank.

use crate::model::mood::Mood;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer identity of a journal entry.
pub type EntryId = i64;

/// Sentinel id for entries that were never persisted.
pub const UNASSIGNED_ENTRY_ID: EntryId = 0;

/// Canonical diary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Storage-assigned id, `0` before first insert.
    pub id: EntryId,
    pub title: String,
    /// Free-form body text.
    pub content: String,
    /// Creation time in Unix epoch milliseconds.
    pub created_at: i64,
    /// Mood label as chosen at composition time.
    pub mood: String,
    pub is_important: bool,
    pub image_uri: Option<String>,
    /// Path of an attached sketch image on device storage.
    pub sketch_path: Option<String>,
    /// Path of an attached audio recording on device storage.
    pub audio_path: Option<String>,
}

/// Validation failures for journal entry invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    NegativeId(EntryId),
    NegativeTimestamp(i64),
    BlankAttachmentPath(&'static str),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeId(value) => write!(f, "id must be >= 0, got {value}"),
            Self::NegativeTimestamp(value) => {
                write!(f, "created_at must be >= 0, got {value}")
            }
            Self::BlankAttachmentPath(field) => {
                write!(f, "{field} must be non-blank when present")
            }
        }
    }
}

impl Error for EntryValidationError {}

impl JournalEntry {
    /// Creates an unsaved entry stamped with `created_at`.
    ///
    /// Attachments start empty and `is_important` starts as `false`.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        mood: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: UNASSIGNED_ENTRY_ID,
            title: title.into(),
            content: content.into(),
            created_at,
            mood: mood.into(),
            is_important: false,
            image_uri: None,
            sketch_path: None,
            audio_path: None,
        }
    }

    /// Returns a copy carrying the given storage id.
    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = id;
        self
    }

    /// Whether storage has assigned an id to this entry.
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ENTRY_ID
    }

    /// Resolves the mood label against the known mood table.
    ///
    /// Returns `None` for labels written by a newer or older app version.
    pub fn known_mood(&self) -> Option<Mood> {
        Mood::from_label(&self.mood)
    }

    /// Checks entry invariants before persistence.
    ///
    /// # Errors
    /// - `NegativeId` when `id < 0`.
    /// - `NegativeTimestamp` when `created_at < 0`.
    /// - `BlankAttachmentPath` when an attachment is `Some("")` or whitespace.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id < 0 {
            return Err(EntryValidationError::NegativeId(self.id));
        }
        if self.created_at < 0 {
            return Err(EntryValidationError::NegativeTimestamp(self.created_at));
        }

        for (field, value) in [
            ("image_uri", &self.image_uri),
            ("sketch_path", &self.sketch_path),
            ("audio_path", &self.audio_path),
        ] {
            if value.as_deref().is_some_and(|path| path.trim().is_empty()) {
                return Err(EntryValidationError::BlankAttachmentPath(field));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryValidationError, JournalEntry};
    use crate::model::mood::Mood;

    #[test]
    fn new_entry_is_unassigned_and_valid() {
        let entry = JournalEntry::new("t", "c", "Calm", 1_000);
        assert!(!entry.is_persisted());
        assert_eq!(entry.known_mood(), Some(Mood::Calm));
        entry.validate().expect("fresh entry should validate");
    }

    #[test]
    fn validate_rejects_negative_timestamp_and_blank_paths() {
        let entry = JournalEntry::new("t", "c", "Calm", -1);
        assert_eq!(
            entry.validate(),
            Err(EntryValidationError::NegativeTimestamp(-1))
        );

        let mut entry = JournalEntry::new("t", "c", "Calm", 1);
        entry.audio_path = Some("  ".to_string());
        assert_eq!(
            entry.validate(),
            Err(EntryValidationError::BlankAttachmentPath("audio_path"))
        );
    }

    #[test]
    fn unknown_mood_is_kept_not_rejected() {
        let entry = JournalEntry::new("t", "c", "Euphoric", 1);
        assert_eq!(entry.known_mood(), None);
        entry.validate().expect("unknown mood must not fail validation");
    }
}
