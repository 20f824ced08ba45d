//! Journal statistics.
//!
//! # Responsibility
//! - Derive streaks, mood distribution, calendar heatmap and monthly counts
//!   from the full entry collection.
//! - Keep derived views fresh while someone is observing them.
//!
//! # Invariants
//! - Aggregation is a pure function of `(entries, calendar)`; it never fails
//!   and never mutates entries.
//! - Every entry change triggers a full recompute; there is no delta path.

mod aggregator;
mod feed;

pub use aggregator::{
    aggregate, current_streak, longest_streak, MonthlyCount, MoodStat, StatsSnapshot,
    TRAILING_MONTHS,
};
pub use feed::{StatsFeed, StatsSubscription, DEFAULT_STATS_GRACE};
