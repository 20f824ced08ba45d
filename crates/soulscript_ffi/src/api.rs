//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Flatten core types into plain envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens its own connection on the resolved database path.
//! - Failures are reported through envelope messages, never by throwing.

use log::warn;
use soulscript_core::config::{DbLocation, DEFAULT_DB_FILE_NAME};
use soulscript_core::db::{open_db, share};
use soulscript_core::model::mood::{color_for_label, icon_for_label};
use soulscript_core::service::home_service::build_home_feed;
use soulscript_core::settings::next_reminder_at;
use soulscript_core::{
    aggregate, core_version as core_version_inner, export_entries_json,
    init_logging as init_logging_inner, ping as ping_inner, preview_text, Calendar, EntryDraft,
    EntryRepository, JournalEntry, Mood, SettingsService, SqliteEntryRepository, SystemCalendar,
    ThemeOption,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::OnceLock;

static JOURNAL_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the journal database path for the rest of the process.
///
/// Without this call the path comes from `SOULSCRIPT_DB_PATH`, then the
/// system temp directory. Must run before the first DB-backed call; later calls with a different
/// path are rejected. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = JOURNAL_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "database already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Entry projection for list and detail screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Whitespace-collapsed prefix of `content`; empty when blank.
    pub preview: String,
    pub created_at: i64,
    pub mood: String,
    pub mood_icon: String,
    /// ARGB color for the mood chip.
    pub mood_color: u32,
    pub is_important: bool,
    pub image_uri: Option<String>,
    pub sketch_path: Option<String>,
    pub audio_path: Option<String>,
}

/// Generic action response envelope for entry commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryActionResponse {
    pub ok: bool,
    /// Affected entry id, when the command targets one entry.
    pub entry_id: Option<i64>,
    pub message: String,
}

impl EntryActionResponse {
    fn success(message: impl Into<String>, entry_id: Option<i64>) -> Self {
        Self {
            ok: true,
            entry_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entry_id: None,
            message: message.into(),
        }
    }
}

/// Fields the composition screen submits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryInput {
    pub title: String,
    pub content: String,
    pub mood: String,
    pub is_important: bool,
    pub image_uri: Option<String>,
    pub sketch_path: Option<String>,
    pub audio_path: Option<String>,
}

/// Creates an entry stamped with the current time.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown mood labels fall back to the default mood.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_create(input: EntryInput) -> EntryActionResponse {
    let calendar = SystemCalendar;
    let entry = draft_from_input(input).into_entry(calendar.now_ms());
    match with_entry_repo(|repo| repo.insert_entry(&entry).map_err(|err| err.to_string())) {
        Ok(id) => EntryActionResponse::success("Entry saved.", Some(id)),
        Err(err) => EntryActionResponse::failure(format!("entry_create failed: {err}")),
    }
}

/// Replaces title/body/mood/attachments of an existing entry.
///
/// `created_at` is preserved. A missing id reports `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_update(id: i64, input: EntryInput) -> EntryActionResponse {
    let entry = draft_from_input(input).into_entry(0).with_id(id);
    match with_entry_repo(|repo| repo.update_entry(&entry).map_err(|err| err.to_string())) {
        Ok(true) => EntryActionResponse::success("Entry updated.", Some(id)),
        Ok(false) => EntryActionResponse::failure(format!("entry {id} not found")),
        Err(err) => EntryActionResponse::failure(format!("entry_update failed: {err}")),
    }
}

/// Lists every entry newest-first. Returns an empty list on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list() -> Vec<EntryItem> {
    match with_entry_repo(|repo| repo.list_entries().map_err(|err| err.to_string())) {
        Ok(entries) => entries.into_iter().map(to_entry_item).collect(),
        Err(err) => {
            warn!("event=entry_list module=ffi status=error error={err}");
            Vec::new()
        }
    }
}

/// Loads one entry; `None` when missing or on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_get(id: i64) -> Option<EntryItem> {
    match with_entry_repo(|repo| repo.get_entry(id).map_err(|err| err.to_string())) {
        Ok(entry) => entry.map(to_entry_item),
        Err(err) => {
            warn!("event=entry_get module=ffi status=error error={err}");
            None
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete(id: i64) -> EntryActionResponse {
    match with_entry_repo(|repo| repo.delete_entry(id).map_err(|err| err.to_string())) {
        Ok(true) => EntryActionResponse::success("Entry deleted.", Some(id)),
        Ok(false) => EntryActionResponse::failure(format!("entry {id} not found")),
        Err(err) => EntryActionResponse::failure(format!("entry_delete failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete_all() -> EntryActionResponse {
    match with_entry_repo(|repo| repo.delete_all().map_err(|err| err.to_string())) {
        Ok(count) => EntryActionResponse::success(format!("Deleted {count} entries."), None),
        Err(err) => EntryActionResponse::failure(format!("entry_delete_all failed: {err}")),
    }
}

/// Mood slice of the distribution chart.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodStatItem {
    pub mood: String,
    pub count: u32,
    pub percentage: f32,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCountItem {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub count: u32,
}

/// One heatmap cell; `day_key` counts days since 1970-01-01 (local).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapCell {
    pub day_key: i64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub streak: u32,
    pub longest_streak: u32,
    pub most_frequent_mood: Option<String>,
    pub total_entries: u64,
    pub mood_distribution: Vec<MoodStatItem>,
    pub monthly_entries: Vec<MonthlyCountItem>,
    pub heatmap: Vec<HeatmapCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsResponse {
    pub ok: bool,
    pub stats: Option<StatsView>,
    pub message: String,
}

/// Computes statistics over every stored entry for "today" on this device.
#[flutter_rust_bridge::frb(sync)]
pub fn stats_get() -> StatsResponse {
    let entries = match with_entry_repo(|repo| repo.list_entries().map_err(|err| err.to_string()))
    {
        Ok(entries) => entries,
        Err(err) => {
            return StatsResponse {
                ok: false,
                stats: None,
                message: format!("stats_get failed: {err}"),
            }
        }
    };
    let snapshot = aggregate(&entries, &SystemCalendar);
    let view = StatsView {
        streak: snapshot.streak,
        longest_streak: snapshot.longest_streak,
        most_frequent_mood: snapshot.most_frequent_mood,
        total_entries: snapshot.total_entries as u64,
        mood_distribution: snapshot
            .mood_distribution
            .into_iter()
            .map(|stat| MoodStatItem {
                mood: stat.mood,
                count: stat.count,
                percentage: stat.percentage,
                color: stat.color,
            })
            .collect(),
        monthly_entries: snapshot
            .monthly_entries
            .into_iter()
            .map(|month| MonthlyCountItem {
                label: month.label.to_string(),
                year: month.year,
                month: month.month,
                count: month.count,
            })
            .collect(),
        heatmap: snapshot
            .heatmap
            .into_iter()
            .map(|(day_key, count)| HeatmapCell { day_key, count })
            .collect(),
    };
    StatsResponse {
        ok: true,
        stats: Some(view),
        message: String::new(),
    }
}

/// Home screen projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub first_name: String,
    pub quote_text: String,
    pub quote_author: String,
    pub recent_entries: Vec<EntryItem>,
    pub on_this_day: Option<EntryItem>,
}

/// Builds the home screen; `None` when the database cannot be read.
#[flutter_rust_bridge::frb(sync)]
pub fn home_get() -> Option<HomeView> {
    let result = with_settings(|settings| {
        let user_name = settings.current().user_name;
        let entries = with_entry_repo(|repo| repo.list_entries().map_err(|err| err.to_string()))?;
        Ok((user_name, entries))
    });
    let (user_name, entries) = match result {
        Ok(value) => value,
        Err(err) => {
            warn!("event=home_get module=ffi status=error error={err}");
            return None;
        }
    };
    let feed = build_home_feed(&entries, &user_name, &SystemCalendar);
    Some(HomeView {
        first_name: feed.first_name,
        quote_text: feed.quote.text.to_string(),
        quote_author: feed.quote.author.to_string(),
        recent_entries: feed.recent_entries.into_iter().map(to_entry_item).collect(),
        on_this_day: feed.on_this_day.map(to_entry_item),
    })
}

/// Preference snapshot for the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    /// `Light|Dark|System`.
    pub theme: String,
    pub notifications_enabled: bool,
    pub user_name: String,
    pub onboarding_completed: bool,
    pub reminder_hour: u8,
    pub reminder_minute: u8,
    pub app_lock_enabled: bool,
    /// Epoch ms of the next daily reminder; `None` when notifications are off.
    pub next_reminder_at: Option<i64>,
}

/// Reads preferences; defaults are returned when storage is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_get() -> SettingsView {
    let settings = match with_settings(|service| Ok(service.current())) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("event=settings_get module=ffi status=error error={err}");
            Default::default()
        }
    };
    SettingsView {
        theme: settings.theme.as_str().to_string(),
        notifications_enabled: settings.notifications_enabled,
        user_name: settings.user_name,
        onboarding_completed: settings.onboarding_completed,
        reminder_hour: settings.reminder_time.hour(),
        reminder_minute: settings.reminder_time.minute(),
        app_lock_enabled: settings.app_lock_enabled,
        next_reminder_at: settings
            .notifications_enabled
            .then(|| next_reminder_at(&SystemCalendar, settings.reminder_time))
            .flatten(),
    }
}

/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_theme(theme: String) -> String {
    let Some(option) = ThemeOption::parse(&theme) else {
        return format!("unsupported theme `{theme}`; expected Light|Dark|System");
    };
    settings_command(|service| service.set_theme(option))
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_notifications(enabled: bool) -> String {
    settings_command(|service| service.set_notifications_enabled(enabled))
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_user_name(name: String) -> String {
    settings_command(|service| service.set_user_name(&name))
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_complete_onboarding(name: String) -> String {
    settings_command(|service| service.complete_onboarding(&name))
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_set_reminder_time(hour: u8, minute: u8) -> String {
    settings_command(|service| service.set_reminder_time(hour, minute))
}

/// Enables the app lock. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn passcode_set(code: String) -> String {
    settings_command(|service| service.set_passcode(&code))
}

#[flutter_rust_bridge::frb(sync)]
pub fn passcode_clear() -> String {
    settings_command(|service| service.clear_passcode())
}

/// `false` on mismatch, when no passcode is set, or on storage failure.
#[flutter_rust_bridge::frb(sync)]
pub fn passcode_verify(code: String) -> bool {
    match with_settings(|service| service.verify_passcode(&code).map_err(|err| err.to_string())) {
        Ok(matched) => matched,
        Err(err) => {
            warn!("event=passcode_verify module=ffi status=error error={err}");
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    pub entry_count: u64,
    pub message: String,
}

/// Writes the journal as JSON to `output_path`.
#[flutter_rust_bridge::frb(sync)]
pub fn export_journal(output_path: String) -> ExportResponse {
    let failure = |message: String| ExportResponse {
        ok: false,
        entry_count: 0,
        message,
    };
    let result = with_settings(|settings| {
        let user_name = settings.current().user_name;
        let entries = with_entry_repo(|repo| repo.list_entries().map_err(|err| err.to_string()))?;
        Ok((user_name, entries))
    });
    let (user_name, entries) = match result {
        Ok(value) => value,
        Err(err) => return failure(format!("export_journal failed: {err}")),
    };
    if entries.is_empty() {
        return failure("No entries to export.".to_string());
    }
    let file = match File::create(output_path.trim()) {
        Ok(file) => file,
        Err(err) => return failure(format!("export_journal failed: {err}")),
    };
    match export_entries_json(
        &entries,
        &user_name,
        &SystemCalendar,
        BufWriter::new(file),
        |_| {},
    ) {
        Ok(summary) => ExportResponse {
            ok: true,
            entry_count: summary.entry_count as u64,
            message: format!("Exported {} entries.", summary.entry_count),
        },
        Err(err) => failure(format!("export_journal failed: {err}")),
    }
}

fn draft_from_input(input: EntryInput) -> EntryDraft {
    let mood = Mood::from_label(input.mood.trim()).unwrap_or_else(|| {
        warn!("event=entry_input module=ffi status=fallback reason=unknown_mood");
        Mood::default()
    });
    EntryDraft {
        title: input.title,
        content: input.content,
        mood,
        is_important: input.is_important,
        image_uri: input.image_uri,
        sketch_path: input.sketch_path,
        audio_path: input.audio_path,
    }
}

fn to_entry_item(entry: JournalEntry) -> EntryItem {
    EntryItem {
        preview: preview_text(&entry.content).unwrap_or_default(),
        mood_icon: icon_for_label(&entry.mood).to_string(),
        mood_color: color_for_label(&entry.mood),
        id: entry.id,
        title: entry.title,
        content: entry.content,
        created_at: entry.created_at,
        mood: entry.mood,
        is_important: entry.is_important,
        image_uri: entry.image_uri,
        sketch_path: entry.sketch_path,
        audio_path: entry.audio_path,
    }
}

fn resolve_journal_db_path() -> PathBuf {
    JOURNAL_DB_PATH
        .get_or_init(|| match DbLocation::resolve(None) {
            DbLocation::File(path) => path,
            DbLocation::InMemory => std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
        })
        .clone()
}

fn with_entry_repo<T>(
    f: impl FnOnce(&SqliteEntryRepository<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_journal_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("journal DB open failed: {err}"))?;
    let repo = SqliteEntryRepository::new(&conn);
    f(&repo)
}

fn with_settings<T>(f: impl FnOnce(&SettingsService) -> Result<T, String>) -> Result<T, String> {
    let db_path = resolve_journal_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("journal DB open failed: {err}"))?;
    let service =
        SettingsService::open(share(conn)).map_err(|err| format!("settings load failed: {err}"))?;
    f(&service)
}

fn settings_command(
    f: impl FnOnce(&SettingsService) -> soulscript_core::settings::SettingsResult<()>,
) -> String {
    match with_settings(|service| f(service).map_err(|err| err.to_string())) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_db_path, core_version, entry_create, entry_delete, entry_get, entry_list,
        entry_update, init_logging, ping, settings_set_reminder_time, settings_set_theme,
        stats_get, EntryInput,
    };
    use soulscript_core::db::open_db;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_db_path_rejects_blank_and_switching() {
        assert!(!configure_db_path("  ".to_string()).is_empty());

        let active = super::resolve_journal_db_path();
        let same = configure_db_path(active.display().to_string());
        assert!(same.is_empty(), "{same}");
        let other = configure_db_path("/definitely/another/journal.sqlite3".to_string());
        assert!(other.contains("refusing to switch"));
    }

    #[test]
    fn entry_create_then_get_and_list() {
        let token = unique_token("entry-create");
        let created = entry_create(EntryInput {
            title: token.clone(),
            content: "  first\n\nline  ".to_string(),
            mood: "Calm".to_string(),
            sketch_path: Some("  ".to_string()),
            ..EntryInput::default()
        });
        assert!(created.ok, "{}", created.message);
        let id = created.entry_id.expect("create should return entry_id");

        let item = entry_get(id).expect("created entry should load");
        assert_eq!(item.title, token);
        assert_eq!(item.preview, "first line");
        assert_eq!(item.mood, "Calm");
        assert_eq!(item.sketch_path, None);
        assert!(entry_list().iter().any(|entry| entry.id == id));
    }

    #[test]
    fn entry_create_falls_back_to_default_mood() {
        let created = entry_create(EntryInput {
            title: unique_token("entry-mood"),
            mood: "Ecstatic".to_string(),
            ..EntryInput::default()
        });
        let id = created.entry_id.expect("create should return entry_id");

        let conn = open_db(super::resolve_journal_db_path()).expect("open db");
        let mood: String = conn
            .query_row(
                "SELECT mood FROM entries WHERE id = ?1",
                rusqlite::params![id],
                |row| row.get(0),
            )
            .expect("query entry row");
        assert_eq!(mood, "Happy");
    }

    #[test]
    fn entry_update_keeps_created_at_and_delete_reports_missing() {
        let created = entry_create(EntryInput {
            title: unique_token("entry-update"),
            mood: "Sad".to_string(),
            ..EntryInput::default()
        });
        let id = created.entry_id.expect("create should return entry_id");
        let before = entry_get(id).expect("entry").created_at;

        let updated = entry_update(
            id,
            EntryInput {
                title: "Renamed".to_string(),
                mood: "Tired".to_string(),
                ..EntryInput::default()
            },
        );
        assert!(updated.ok, "{}", updated.message);
        let after = entry_get(id).expect("entry");
        assert_eq!(after.title, "Renamed");
        assert_eq!(after.created_at, before);

        assert!(entry_delete(id).ok);
        assert!(!entry_delete(id).ok);
        assert!(entry_get(id).is_none());
    }

    #[test]
    fn stats_get_counts_today() {
        let created = entry_create(EntryInput {
            title: unique_token("entry-stats"),
            mood: "Focused".to_string(),
            ..EntryInput::default()
        });
        assert!(created.ok, "{}", created.message);

        let response = stats_get();
        assert!(response.ok, "{}", response.message);
        let stats = response.stats.expect("stats");
        assert!(stats.total_entries >= 1);
        assert!(stats.streak >= 1);
        assert_eq!(stats.monthly_entries.len(), 6);
    }

    #[test]
    fn settings_commands_validate_input() {
        assert!(settings_set_theme("sepia".to_string()).contains("unsupported theme"));
        assert!(!settings_set_reminder_time(24, 0).is_empty());
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
