//! Date utilities for daily reset hour handling.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use study_core::DateKey;

/// Study date for a local wall-clock time.
///
/// Before `daily_reset_hour` the study day is still the previous calendar day.
pub fn adjusted_date(local: NaiveDateTime, daily_reset_hour: u32) -> NaiveDate {
    if local.hour() < daily_reset_hour {
        (local - Duration::days(1)).date()
    } else {
        local.date()
    }
}

/// Date key of the study day containing `now`, read on the local wall clock.
pub fn today_key_at<Tz: TimeZone>(now: DateTime<Tz>, daily_reset_hour: u32) -> DateKey {
    let local = now.with_timezone(&Local).naive_local();
    DateKey::from_date(adjusted_date(local, daily_reset_hour))
}
