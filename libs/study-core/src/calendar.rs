//! Month calendar and streak derived from the completion history.

use crate::date::DateKey;
use crate::error::{EngineError, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

/// One day cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub date_key: DateKey,
    pub completed: bool,
    pub is_today: bool,
}

/// Month grid starting on Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st (0 when the month starts on Sunday).
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

/// Build the calendar for `year`/`month` (1-12).
pub fn month_calendar(
    year: i32,
    month: u32,
    history: &BTreeSet<DateKey>,
    today: DateKey,
) -> Result<MonthCalendar> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidDateKey(format!("{:04}-{:02}", year, month)))?;

    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| {
            let date_key = DateKey::from_date(date);
            CalendarDay {
                day: date.day(),
                date_key,
                completed: history.contains(&date_key),
                is_today: date_key == today,
            }
        })
        .collect();

    Ok(MonthCalendar {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}

/// Consecutive completed days ending today.
///
/// An incomplete today does not break the streak; counting then starts from yesterday.
pub fn completion_streak(history: &BTreeSet<DateKey>, today: DateKey) -> usize {
    let mut current = if history.contains(&today) {
        Some(today)
    } else {
        today.pred()
    };

    let mut streak = 0usize;
    while let Some(day) = current {
        if !history.contains(&day) {
            break;
        }
        streak += 1;
        current = day.pred();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    fn history(keys: &[&str]) -> BTreeSet<DateKey> {
        keys.iter().map(|k| key(k)).collect()
    }

    #[test]
    fn february_leap_year_layout() {
        // 2024-02-01 is a Thursday.
        let cal = month_calendar(2024, 2, &BTreeSet::new(), key("2024-02-10")).unwrap();
        assert_eq!(cal.leading_blanks, 4);
        assert_eq!(cal.days.len(), 29);
        assert_eq!(cal.days[0].date_key, key("2024-02-01"));
        assert!(cal.days[9].is_today);
        assert_eq!(cal.days.iter().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn marks_completed_days() {
        let hist = history(&["2024-09-01", "2024-09-15", "2024-10-01"]);
        let cal = month_calendar(2024, 9, &hist, key("2024-09-20")).unwrap();
        // 2024-09-01 is a Sunday.
        assert_eq!(cal.leading_blanks, 0);
        let completed: Vec<u32> = cal.days.iter().filter(|d| d.completed).map(|d| d.day).collect();
        assert_eq!(completed, vec![1, 15]);
    }

    #[test]
    fn invalid_month_rejected() {
        assert!(month_calendar(2024, 13, &BTreeSet::new(), key("2024-01-01")).is_err());
    }

    #[test]
    fn streak_counts_back_from_today() {
        let hist = history(&["2024-01-03", "2024-01-04", "2024-01-05"]);
        assert_eq!(completion_streak(&hist, key("2024-01-05")), 3);
    }

    #[test]
    fn streak_survives_incomplete_today() {
        let hist = history(&["2024-01-03", "2024-01-04"]);
        assert_eq!(completion_streak(&hist, key("2024-01-05")), 2);
    }

    #[test]
    fn streak_broken_by_gap() {
        let hist = history(&["2024-01-01", "2024-01-03"]);
        assert_eq!(completion_streak(&hist, key("2024-01-05")), 0);
        assert_eq!(completion_streak(&hist, key("2024-01-03")), 1);
    }
}
