//! Logging streaks and calendar-day helpers.

use chrono::{Days, NaiveDate, Utc};

use crate::entries::Entry;
use crate::error::CoreError;

/// Storage and wire format for entry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Count the run of consecutive logged days ending at the most recent one.
///
/// Only entries with at least one metric count. The most recent logged day
/// always counts as 1, whether or not it is today. Walking backwards, each
/// step of exactly one calendar day extends the run; any other gap ends it.
/// Two entries sharing a date (gap of zero) also end the run: duplicates are
/// never merged.
pub fn calculate_streak(entries: &[Entry]) -> u32 {
    let mut dates: Vec<NaiveDate> = entries
        .iter()
        .filter(|e| e.has_data())
        .map(|e| e.date)
        .collect();

    if dates.is_empty() {
        return 0;
    }

    dates.sort_unstable_by(|a, b| b.cmp(a));

    let mut streak = 1;
    for pair in dates.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Today's calendar date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Shift a date by a signed number of days. `None` on calendar overflow.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| CoreError::Validation(format!("Invalid date '{s}', expected YYYY-MM-DD")))
}
