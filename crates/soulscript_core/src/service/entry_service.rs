//! Entry composition use-cases.
//!
//! # Responsibility
//! - Turn an in-progress draft into a persisted journal entry.
//! - Derive list previews from entry bodies.
//!
//! # Invariants
//! - `created_at` is stamped from the injected calendar at save time.
//! - Blank attachment paths are stored as `None`.

use crate::calendar::Calendar;
use crate::content::templates::JournalTemplate;
use crate::model::entry::{EntryId, JournalEntry};
use crate::model::mood::Mood;
use crate::store::{EntryStore, StoreResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

const PREVIEW_MAX_CHARS: usize = 100;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// State of the entry-composition screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub is_important: bool,
    pub image_uri: Option<String>,
    pub sketch_path: Option<String>,
    pub audio_path: Option<String>,
}

impl EntryDraft {
    /// Starts a draft pre-filled from a writing template.
    pub fn from_template(template: &JournalTemplate) -> Self {
        Self {
            title: template.title.to_string(),
            content: template.content.to_string(),
            ..Self::default()
        }
    }

    /// Fills title/content only where the user has not typed anything yet.
    pub fn prefill(&mut self, title: Option<&str>, content: Option<&str>) {
        if self.title.trim().is_empty() {
            self.title = title.unwrap_or_default().to_string();
        }
        if self.content.trim().is_empty() {
            self.content = content.unwrap_or_default().to_string();
        }
    }

    /// Builds an unsaved entry stamped with `created_at`.
    pub fn into_entry(self, created_at: i64) -> JournalEntry {
        let mut entry = JournalEntry::new(self.title, self.content, self.mood.label(), created_at);
        entry.is_important = self.is_important;
        entry.image_uri = normalize_path(self.image_uri);
        entry.sketch_path = normalize_path(self.sketch_path);
        entry.audio_path = normalize_path(self.audio_path);
        entry
    }
}

/// Entry use-case service over the reactive store.
#[derive(Clone)]
pub struct EntryService {
    store: EntryStore,
    calendar: Arc<dyn Calendar>,
}

impl EntryService {
    pub fn new(store: EntryStore, calendar: Arc<dyn Calendar>) -> Self {
        Self { store, calendar }
    }

    /// Persists a draft as a new entry created "now".
    pub async fn save_draft(&self, draft: EntryDraft) -> StoreResult<EntryId> {
        let entry = draft.into_entry(self.calendar.now_ms());
        self.store.insert(entry).await
    }

    /// Deletes an entry from its detail view; `Ok(false)` when already gone.
    pub async fn delete_entry(&self, id: EntryId) -> StoreResult<bool> {
        self.store.delete(id).await
    }

    /// Clears the whole journal.
    pub async fn clear_all(&self) -> StoreResult<usize> {
        self.store.delete_all().await
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }
}

/// Plain-text list preview: whitespace collapsed, at most 100 chars.
pub fn preview_text(content: &str) -> Option<String> {
    let normalized = WHITESPACE_RE.replace_all(content, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}

fn normalize_path(path: Option<String>) -> Option<String> {
    path.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{preview_text, EntryDraft};
    use crate::content::templates::TEMPLATES;
    use crate::model::mood::Mood;

    #[test]
    fn preview_collapses_whitespace_and_truncates() {
        let preview = preview_text("  line one\n\n\tline two  ").expect("preview");
        assert_eq!(preview, "line one line two");

        let long = "x".repeat(250);
        assert_eq!(preview_text(&long).expect("preview").chars().count(), 100);
        assert_eq!(preview_text(" \n "), None);
    }

    #[test]
    fn draft_defaults_to_first_mood_and_drops_blank_paths() {
        let draft = EntryDraft {
            title: "t".to_string(),
            sketch_path: Some("   ".to_string()),
            audio_path: Some(" /a/b.m4a ".to_string()),
            ..EntryDraft::default()
        };
        assert_eq!(draft.mood, Mood::Happy);

        let entry = draft.into_entry(42);
        assert_eq!(entry.mood, "Happy");
        assert_eq!(entry.created_at, 42);
        assert_eq!(entry.sketch_path, None);
        assert_eq!(entry.audio_path.as_deref(), Some("/a/b.m4a"));
        entry.validate().expect("draft entry should validate");
    }

    #[test]
    fn prefill_keeps_user_typed_text() {
        let mut draft = EntryDraft::from_template(&TEMPLATES[0]);
        draft.prefill(Some("Other"), Some("Other body"));
        assert_eq!(draft.title, "Daily Gratitude");

        let mut empty = EntryDraft::default();
        empty.prefill(Some("Title"), None);
        assert_eq!(empty.title, "Title");
        assert_eq!(empty.content, "");
    }
}
