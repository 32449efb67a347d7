//! Calendar and streak commands.

use super::{current_settings, repository, CommandError};
use crate::db::date_utils::today_key_at;
use crate::db::EntryRepository;
use crate::state::AppState;
use study_core::{
    completion_streak, load_history, month_calendar, DateKey, MonthCalendar, TODAY_DONE_PREFIX,
};

/// Overall completion statistics.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StreakStats {
    pub current_streak: usize,
    /// Days whose whole study set was completed.
    pub completed_days: usize,
    /// Days with at least one item marked done.
    pub active_days: usize,
}

/// Get the completion calendar for a month (1-12).
pub fn get_month_calendar(
    state: &AppState,
    year: i32,
    month: u32,
) -> Result<MonthCalendar, CommandError> {
    let repo = repository(state)?;
    let settings = current_settings(&repo)?;
    let today = today_key_at(state.clock.now(), settings.daily_reset_hour);
    let history = load_history(&*repo)?;
    month_calendar(year, month, &history, today).map_err(Into::into)
}

/// Get streak and day counts.
pub fn get_streak_stats(state: &AppState) -> Result<StreakStats, CommandError> {
    let repo = repository(state)?;
    let settings = current_settings(&repo)?;
    let today = today_key_at(state.clock.now(), settings.daily_reset_hour);
    let history = load_history(&*repo)?;

    let mut active_days = 0;
    for key in repo.entry_keys(TODAY_DONE_PREFIX)? {
        let is_day = key
            .strip_prefix(TODAY_DONE_PREFIX)
            .is_some_and(|date| DateKey::parse(date).is_ok());
        if !is_day {
            continue;
        }
        let done: Vec<String> = match repo.get_entry(&key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(crate::db::DbError::from)?,
            None => Vec::new(),
        };
        if !done.is_empty() {
            active_days += 1;
        }
    }

    Ok(StreakStats {
        current_streak: completion_streak(&history, today),
        completed_days: history.len(),
        active_days,
    })
}
