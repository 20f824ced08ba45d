//! Daily reminder trigger computation.

use crate::calendar::Calendar;
use crate::settings::ReminderTime;
use chrono::Days;

/// Epoch milliseconds of the next reminder strictly after "now".
///
/// Fires today when the time is still ahead, otherwise tomorrow. Returns
/// `None` only when both candidates fall into a daylight-saving gap.
pub fn next_reminder_at(calendar: &dyn Calendar, time: ReminderTime) -> Option<i64> {
    let now_ms = calendar.now_ms();
    let today = calendar.today();

    [Some(today), today.checked_add_days(Days::new(1))]
        .into_iter()
        .flatten()
        .filter_map(|date| {
            let local = date.and_hms_opt(u32::from(time.hour()), u32::from(time.minute()), 0)?;
            calendar.local_to_epoch_ms(local)
        })
        .find(|candidate| *candidate > now_ms)
}

#[cfg(test)]
mod tests {
    use super::next_reminder_at;
    use crate::calendar::{Calendar, FixedCalendar};
    use crate::settings::ReminderTime;
    use chrono::NaiveDate;

    fn calendar() -> FixedCalendar {
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).expect("date");
        FixedCalendar::at_noon(date, 3600).expect("calendar")
    }

    #[test]
    fn later_today_fires_today() {
        let calendar = calendar();
        let time = ReminderTime::new(20, 30).expect("time");
        let at = next_reminder_at(&calendar, time).expect("reminder");
        assert_eq!(at - calendar.now_ms(), (8 * 60 + 30) * 60 * 1000);
    }

    #[test]
    fn past_or_current_time_rolls_to_tomorrow() {
        let calendar = calendar();
        let noon = ReminderTime::new(12, 0).expect("time");
        let at = next_reminder_at(&calendar, noon).expect("reminder");
        assert_eq!(at - calendar.now_ms(), 24 * 60 * 60 * 1000);
    }
}
