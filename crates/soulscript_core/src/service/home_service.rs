//! Home screen projection.

use crate::calendar::{Calendar, MonthDay};
use crate::content::quotes::{quote_of_the_day, Quote};
use crate::model::entry::JournalEntry;
use chrono::Datelike;

/// Number of entries shown in the "recent" strip.
pub const RECENT_ENTRY_COUNT: usize = 5;

/// Everything the home screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeFeed {
    pub first_name: String,
    pub recent_entries: Vec<JournalEntry>,
    pub quote: Quote,
    /// Newest entry written on today's month/day in an earlier year.
    pub on_this_day: Option<JournalEntry>,
}

/// Builds the home feed from a newest-first entry snapshot.
pub fn build_home_feed(
    entries: &[JournalEntry],
    user_name: &str,
    calendar: &dyn Calendar,
) -> HomeFeed {
    let today = calendar.today();
    HomeFeed {
        first_name: first_name(user_name),
        recent_entries: entries.iter().take(RECENT_ENTRY_COUNT).cloned().collect(),
        quote: quote_of_the_day(today),
        on_this_day: on_this_day_memory(entries, calendar),
    }
}

/// Newest entry sharing today's month/day from a previous year.
pub fn on_this_day_memory(
    entries: &[JournalEntry],
    calendar: &dyn Calendar,
) -> Option<JournalEntry> {
    let today = calendar.today();
    let month_day = MonthDay::of(today);
    entries
        .iter()
        .find(|entry| {
            let date = calendar.local_date(entry.created_at);
            month_day.matches(date) && date.year() < today.year()
        })
        .cloned()
}

/// First whitespace-separated word of the stored user name.
pub fn first_name(user_name: &str) -> String {
    user_name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::first_name;

    #[test]
    fn first_name_takes_first_word() {
        assert_eq!(first_name("Ada Lovelace"), "Ada");
        assert_eq!(first_name("  Grace  "), "Grace");
        assert_eq!(first_name(""), "");
    }
}
