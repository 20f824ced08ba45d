//! Local calendar abstraction for day bucketing.
//!
//! # Responsibility
//! - Map epoch-millisecond timestamps to local calendar dates.
//! - Provide "today" so aggregation stays a pure function of its inputs.
//!
//! # Invariants
//! - `DayKey` is the number of days between 1970-01-01 and the *local* date,
//!   so two entries share a key iff they share a local calendar day.
//! - Out-of-range timestamps are clamped to the Unix epoch instead of failing.

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use std::fmt::{Display, Formatter};

/// Days since 1970-01-01 of a local calendar date.
pub type DayKey = i64;

/// Source of "now" plus the local timezone rules used for bucketing.
pub trait Calendar: Send + Sync {
    /// Current instant in the local offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Local calendar date for a Unix epoch-millisecond timestamp.
    fn local_date(&self, epoch_ms: i64) -> NaiveDate;

    /// Epoch milliseconds of a local wall-clock time.
    ///
    /// Returns the earliest instant for ambiguous times and `None` inside
    /// a daylight-saving gap.
    fn local_to_epoch_ms(&self, local: NaiveDateTime) -> Option<i64>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }

    fn day_key(&self, epoch_ms: i64) -> DayKey {
        day_key_of(self.local_date(epoch_ms))
    }
}

/// Calendar backed by the device clock and timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCalendar;

impl Calendar for SystemCalendar {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn local_date(&self, epoch_ms: i64) -> NaiveDate {
        utc_from_ms(epoch_ms).with_timezone(&Local).date_naive()
    }

    fn local_to_epoch_ms(&self, local: NaiveDateTime) -> Option<i64> {
        Local
            .from_local_datetime(&local)
            .earliest()
            .map(|value| value.timestamp_millis())
    }
}

/// Calendar pinned to one instant in a fixed UTC offset.
///
/// Used by tests and by callers that need reproducible statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCalendar {
    now: DateTime<FixedOffset>,
}

impl FixedCalendar {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Pins "now" to local noon of `date` in the given offset.
    ///
    /// Returns `None` when `offset_seconds` is outside +-24h.
    pub fn at_noon(date: NaiveDate, offset_seconds: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(offset_seconds)?;
        let local = date.and_hms_opt(12, 0, 0)?;
        let now = offset.from_local_datetime(&local).single()?;
        Some(Self::new(now))
    }

    /// Epoch milliseconds of `hour:minute` local time on `date`.
    ///
    /// Returns `None` for an out-of-range hour or minute.
    pub fn timestamp_on(&self, date: NaiveDate, hour: u32, minute: u32) -> Option<i64> {
        date.and_hms_opt(hour, minute, 0)
            .and_then(|local| self.local_to_epoch_ms(local))
    }
}

impl Calendar for FixedCalendar {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    fn local_date(&self, epoch_ms: i64) -> NaiveDate {
        utc_from_ms(epoch_ms)
            .with_timezone(self.now.offset())
            .date_naive()
    }

    fn local_to_epoch_ms(&self, local: NaiveDateTime) -> Option<i64> {
        self.now
            .offset()
            .from_local_datetime(&local)
            .single()
            .map(|value| value.timestamp_millis())
    }
}

/// Month and day of month, independent of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Builds a month-day that exists in at least one year (Feb 29 included).
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Parses the `MM-DD` form.
    pub fn parse(value: &str) -> Option<Self> {
        let (month, day) = value.trim().split_once('-')?;
        Self::new(month.parse().ok()?, day.parse().ok()?)
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn day(self) -> u32 {
        self.day
    }

    pub fn matches(self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

impl Display for MonthDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Converts a local date to its `DayKey`.
pub fn day_key_of(date: NaiveDate) -> DayKey {
    date.signed_duration_since(NaiveDate::default()).num_days()
}

/// Converts a `DayKey` back to the local date it names.
pub fn date_of_day_key(key: DayKey) -> Option<NaiveDate> {
    NaiveDate::default().checked_add_signed(chrono::Duration::try_days(key)?)
}

fn utc_from_ms(epoch_ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{date_of_day_key, day_key_of, Calendar, FixedCalendar, MonthDay};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn day_key_counts_days_from_epoch() {
        assert_eq!(day_key_of(date(1970, 1, 1)), 0);
        assert_eq!(day_key_of(date(1970, 1, 2)), 1);
        assert_eq!(date_of_day_key(19_723), Some(date(2024, 1, 1)));
    }

    #[test]
    fn local_date_respects_offset() {
        // 2024-01-01T23:30Z is already Jan 2 at +02:00 and still Jan 1 at -05:00.
        let instant = 1_704_151_800_000;
        let east = FixedCalendar::at_noon(date(2024, 1, 2), 2 * 3600).expect("calendar");
        let west = FixedCalendar::at_noon(date(2024, 1, 2), -5 * 3600).expect("calendar");
        assert_eq!(east.local_date(instant), date(2024, 1, 2));
        assert_eq!(west.local_date(instant), date(2024, 1, 1));
    }

    #[test]
    fn month_day_parses_and_formats() {
        let leap = MonthDay::parse("02-29").expect("leap day is a valid month-day");
        assert_eq!(leap.to_string(), "02-29");
        assert!(MonthDay::parse("13-01").is_none());
        assert!(MonthDay::parse("0431").is_none());
        assert!(MonthDay::new(4, 31).is_none());
    }

    #[test]
    fn timestamp_on_roundtrips_through_local_date() {
        let calendar = FixedCalendar::at_noon(date(2024, 3, 10), 9 * 3600).expect("calendar");
        let ts = calendar
            .timestamp_on(date(2024, 3, 1), 0, 5)
            .expect("valid local time");
        assert_eq!(calendar.local_date(ts), date(2024, 3, 1));
        assert_eq!(calendar.today(), date(2024, 3, 10));
    }

    #[test]
    fn timestamp_on_rejects_out_of_range_times() {
        let calendar = FixedCalendar::at_noon(date(2024, 3, 10), 0).expect("calendar");
        assert_eq!(calendar.timestamp_on(date(2024, 3, 1), 24, 0), None);
        assert_eq!(calendar.timestamp_on(date(2024, 3, 1), 8, 60), None);
    }
}
