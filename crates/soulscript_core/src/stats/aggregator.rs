//! Pure aggregation pipeline from entries to a `StatsSnapshot`.

use crate::calendar::{day_key_of, Calendar, DayKey};
use crate::model::entry::JournalEntry;
use crate::model::mood::color_for_label;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Number of calendar months covered by `monthly_entries`, current included.
pub const TRAILING_MONTHS: u32 = 6;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Share of entries written with one mood label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodStat {
    pub mood: String,
    pub count: u32,
    /// `count / total * 100`, unrounded.
    pub percentage: f32,
    /// ARGB chart color; gray for unknown labels.
    pub color: u32,
}

/// Entry count for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
    /// Short English month name, e.g. `Jan`.
    pub label: &'static str,
    pub count: u32,
}

/// Immutable aggregation result over the full entry collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Consecutive days with entries, ending today or yesterday.
    pub streak: u32,
    /// Longest run of consecutive days with entries anywhere in history.
    pub longest_streak: u32,
    /// Mood with the highest count; ties go to the first label encountered
    /// in newest-first entry order.
    pub most_frequent_mood: Option<String>,
    /// Entries per local calendar day.
    pub heatmap: BTreeMap<DayKey, u32>,
    pub total_entries: usize,
    /// Sorted by count descending; ties keep first-encountered order.
    pub mood_distribution: Vec<MoodStat>,
    /// Oldest month first, current month last.
    pub monthly_entries: Vec<MonthlyCount>,
}

/// Recomputes every statistic from scratch.
///
/// `entries` is expected newest-first (the store's order); only mood
/// tie-breaking depends on it.
pub fn aggregate<C: Calendar + ?Sized>(entries: &[JournalEntry], calendar: &C) -> StatsSnapshot {
    let today = calendar.today();
    let local_dates: Vec<NaiveDate> = entries
        .iter()
        .map(|entry| calendar.local_date(entry.created_at))
        .collect();
    let monthly_entries = monthly_counts(&local_dates, today);

    if entries.is_empty() {
        return StatsSnapshot {
            streak: 0,
            longest_streak: 0,
            most_frequent_mood: None,
            heatmap: BTreeMap::new(),
            total_entries: 0,
            mood_distribution: Vec::new(),
            monthly_entries,
        };
    }

    let mut heatmap = BTreeMap::new();
    for date in &local_dates {
        *heatmap.entry(day_key_of(*date)).or_insert(0) += 1;
    }

    let mood_distribution = mood_distribution(entries);
    let most_frequent_mood = mood_distribution.first().map(|stat| stat.mood.clone());

    StatsSnapshot {
        streak: current_streak(heatmap.keys().copied(), day_key_of(today)),
        longest_streak: longest_streak(heatmap.keys().copied()),
        most_frequent_mood,
        heatmap,
        total_entries: entries.len(),
        mood_distribution,
        monthly_entries,
    }
}

/// Streak of consecutive days ending today or yesterday.
///
/// `days` must be ascending and distinct. When the latest day is older than
/// yesterday (or in the future) the streak is zero; a lone entry dated
/// yesterday counts as a streak of one.
pub fn current_streak(days: impl DoubleEndedIterator<Item = DayKey>, today: DayKey) -> u32 {
    let mut newest_first = days.rev();
    let Some(latest) = newest_first.next() else {
        return 0;
    };
    if latest != today && latest != today - 1 {
        return 0;
    }

    let mut streak = 1;
    let mut previous = latest;
    for day in newest_first {
        if previous - day != 1 {
            break;
        }
        streak += 1;
        previous = day;
    }
    streak
}

/// Longest run of consecutive days; `days` must be ascending and distinct.
pub fn longest_streak(days: impl Iterator<Item = DayKey>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<DayKey> = None;
    for day in days {
        run = match previous {
            Some(prev) if day - prev == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

fn mood_distribution(entries: &[JournalEntry]) -> Vec<MoodStat> {
    let mut counts: Vec<(&str, u32)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        let label = entry.mood.as_str();
        match positions.get(label).copied() {
            Some(index) => counts[index].1 += 1,
            None => {
                positions.insert(label, counts.len());
                counts.push((label, 1));
            }
        }
    }

    let total = entries.len() as f32;
    let mut stats: Vec<MoodStat> = counts
        .into_iter()
        .map(|(label, count)| MoodStat {
            mood: label.to_string(),
            count,
            percentage: count as f32 / total * 100.0,
            color: color_for_label(label),
        })
        .collect();
    // Stable sort keeps first-encountered order among equal counts.
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

fn monthly_counts(local_dates: &[NaiveDate], today: NaiveDate) -> Vec<MonthlyCount> {
    let mut per_month: HashMap<(i32, u32), u32> = HashMap::new();
    for date in local_dates {
        *per_month.entry((date.year(), date.month())).or_insert(0) += 1;
    }

    (0..TRAILING_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = months_before(today.year(), today.month(), back);
            MonthlyCount {
                year,
                month,
                label: MONTH_LABELS[(month - 1) as usize],
                count: per_month.get(&(year, month)).copied().unwrap_or(0),
            }
        })
        .collect()
}

fn months_before(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}
