use chrono::NaiveDate;
use soulscript_core::db::open_db_in_memory;
use soulscript_core::repo::RepoError;
use soulscript_core::{
    EntryRepository, EntryValidationError, FixedCalendar, JournalEntry, MonthDay,
    SqliteEntryRepository,
};

#[test]
fn insert_assigns_increasing_ids_and_get_round_trips_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let mut entry = JournalEntry::new("Morning", "Coffee and pages", "Calm", 1_700_000_000_000);
    entry.is_important = true;
    entry.sketch_path = Some("/sketches/1.png".to_string());
    let first = repo.insert_entry(&entry).unwrap();
    let second = repo
        .insert_entry(&JournalEntry::new("Evening", "", "Tired", 1_700_000_100_000))
        .unwrap();
    assert!(first > 0);
    assert!(second > first);

    let loaded = repo.get_entry(first).unwrap().unwrap();
    assert_eq!(loaded, entry.clone().with_id(first));
    assert_eq!(repo.get_entry(9_999).unwrap(), None);
}

#[test]
fn insert_with_existing_id_replaces_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let id = repo
        .insert_entry(&JournalEntry::new("Draft", "a", "Happy", 10))
        .unwrap();
    let replaced = JournalEntry::new("Final", "b", "Sad", 20).with_id(id);
    assert_eq!(repo.insert_entry(&replaced).unwrap(), id);

    let all = repo.list_entries().unwrap();
    assert_eq!(all, vec![replaced]);
}

#[test]
fn update_keeps_created_at_and_reports_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let id = repo
        .insert_entry(&JournalEntry::new("Title", "Body", "Happy", 5_000))
        .unwrap();
    let mut edited = JournalEntry::new("New title", "New body", "Focused", 9_999).with_id(id);
    edited.audio_path = Some("/audio/1.m4a".to_string());
    assert!(repo.update_entry(&edited).unwrap());

    let loaded = repo.get_entry(id).unwrap().unwrap();
    assert_eq!(loaded.title, "New title");
    assert_eq!(loaded.mood, "Focused");
    assert_eq!(loaded.audio_path.as_deref(), Some("/audio/1.m4a"));
    assert_eq!(loaded.created_at, 5_000);

    let missing = JournalEntry::new("x", "y", "Happy", 1).with_id(id + 100);
    assert!(!repo.update_entry(&missing).unwrap());
}

#[test]
fn list_is_newest_first_with_id_tiebreak() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let old = repo
        .insert_entry(&JournalEntry::new("old", "", "Happy", 1_000))
        .unwrap();
    let tie_a = repo
        .insert_entry(&JournalEntry::new("tie a", "", "Happy", 2_000))
        .unwrap();
    let tie_b = repo
        .insert_entry(&JournalEntry::new("tie b", "", "Happy", 2_000))
        .unwrap();

    let ids: Vec<i64> = repo.list_entries().unwrap().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![tie_b, tie_a, old]);
}

#[test]
fn delete_and_delete_all_report_affected_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let id = repo
        .insert_entry(&JournalEntry::new("a", "", "Happy", 1))
        .unwrap();
    repo.insert_entry(&JournalEntry::new("b", "", "Happy", 2))
        .unwrap();
    repo.insert_entry(&JournalEntry::new("c", "", "Happy", 3))
        .unwrap();

    assert!(repo.delete_entry(id).unwrap());
    assert!(!repo.delete_entry(id).unwrap());
    assert_eq!(repo.delete_all().unwrap(), 2);
    assert!(repo.list_entries().unwrap().is_empty());
    assert_eq!(repo.delete_all().unwrap(), 0);
}

#[test]
fn invalid_entries_are_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let negative = JournalEntry::new("t", "c", "Happy", -1);
    let err = repo.insert_entry(&negative).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(EntryValidationError::NegativeTimestamp(-1))
    ));

    let mut blank_path = JournalEntry::new("t", "c", "Happy", 1);
    blank_path.image_uri = Some("   ".to_string());
    assert!(matches!(
        repo.insert_entry(&blank_path).unwrap_err(),
        RepoError::Validation(EntryValidationError::BlankAttachmentPath(_))
    ));
}

#[test]
fn on_this_day_matches_local_month_and_day_across_years() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);
    // UTC+9: 2021-03-14 23:30 UTC is already 2021-03-15 locally.
    let calendar = FixedCalendar::at_noon(date(2024, 3, 15), 9 * 3600).unwrap();

    let this_year = repo
        .insert_entry(&JournalEntry::new(
            "this year",
            "",
            "Happy",
            calendar.timestamp_on(date(2024, 3, 15), 8, 0).expect("valid local time"),
        ))
        .unwrap();
    let shifted = repo
        .insert_entry(&JournalEntry::new(
            "late utc",
            "",
            "Happy",
            calendar.timestamp_on(date(2021, 3, 15), 8, 30).expect("valid local time"),
        ))
        .unwrap();
    repo.insert_entry(&JournalEntry::new(
        "other day",
        "",
        "Happy",
        calendar.timestamp_on(date(2023, 3, 16), 8, 0).expect("valid local time"),
    ))
    .unwrap();

    let month_day = MonthDay::new(3, 15).unwrap();
    let ids: Vec<i64> = repo
        .list_on_this_day(month_day, &calendar)
        .unwrap()
        .iter()
        .map(|entry| entry.id)
        .collect();
    assert_eq!(ids, vec![this_year, shifted]);
}

#[test]
fn on_this_day_leap_day_only_matches_leap_day() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);
    let calendar = FixedCalendar::at_noon(date(2028, 2, 29), 0).unwrap();

    let leap = repo
        .insert_entry(&JournalEntry::new(
            "leap",
            "",
            "Happy",
            calendar.timestamp_on(date(2024, 2, 29), 10, 0).expect("valid local time"),
        ))
        .unwrap();
    repo.insert_entry(&JournalEntry::new(
        "march first",
        "",
        "Happy",
        calendar.timestamp_on(date(2023, 3, 1), 10, 0).expect("valid local time"),
    ))
    .unwrap();

    let matches = repo
        .list_on_this_day(MonthDay::new(2, 29).unwrap(), &calendar)
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, leap);
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
