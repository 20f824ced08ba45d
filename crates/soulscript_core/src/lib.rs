//! Core domain logic for SoulScript.
//! Entries, statistics and preferences live here; UI layers only observe.

pub mod calendar;
pub mod config;
pub mod content;
pub mod db;
pub mod export;
pub mod journal;
pub mod logging;
pub mod model;
pub mod repo;
pub mod security;
pub mod service;
pub mod settings;
pub mod stats;
pub mod store;

pub use calendar::{Calendar, DayKey, FixedCalendar, MonthDay, SystemCalendar};
pub use config::{CoreConfig, DbLocation};
pub use export::{export_entries_json, ExportError, ExportResult, ExportSummary};
pub use journal::{CoreError, CoreResult, Journal};
pub use logging::{
    init_logging, logging_status, start_logging, LogLevel, LoggingError, LoggingStatus,
};
pub use model::entry::{EntryId, EntryValidationError, JournalEntry};
pub use model::mood::{Mood, MoodDisplay};
pub use repo::entry_repo::{EntryRepository, SqliteEntryRepository};
pub use repo::{RepoError, RepoResult};
pub use service::entry_service::{preview_text, EntryDraft, EntryService};
pub use service::home_service::{build_home_feed, HomeFeed};
pub use settings::{ReminderTime, Settings, SettingsError, SettingsService, ThemeOption};
pub use stats::{aggregate, MonthlyCount, MoodStat, StatsFeed, StatsSnapshot};
pub use store::{EntrySnapshot, EntryStore, EntrySubscription, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
