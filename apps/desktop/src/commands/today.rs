//! Today's mission commands.

use super::{current_settings, repository, CommandError};
use crate::db::date_utils::today_key_at;
use crate::db::SqliteRepository;
use crate::state::AppState;
use study_core::{
    completion_streak, CompletionState, ContentItem, DailySelection, DailySelector, DateKey,
    DayProgress,
};

/// Today's study set with its completion state.
#[derive(Debug, serde::Serialize)]
pub struct TodayMission {
    pub date_key: DateKey,
    pub words: Vec<ContentItem>,
    pub phrase: ContentItem,
    pub completed: Vec<String>,
    pub progress: DayProgress,
    pub day_complete: bool,
    pub streak: usize,
}

#[derive(Debug, serde::Serialize)]
pub struct ToggleResponse {
    pub id: String,
    pub done: bool,
    pub day_logged: bool,
    pub progress: DayProgress,
}

/// Derive today's selection and completion. The caller holds the repository lock.
fn load_today(
    state: &AppState,
    repo: &SqliteRepository,
) -> Result<(DailySelection, CompletionState), CommandError> {
    let settings = current_settings(repo)?;
    let date_key = today_key_at(state.clock.now(), settings.daily_reset_hour);
    let selection = DailySelector::from_settings(&settings).select(&state.pool, date_key)?;
    let completion = CompletionState::load(repo, &selection)?;
    Ok((selection, completion))
}

/// Get today's words, phrase and progress.
pub fn get_today_mission(state: &AppState) -> Result<TodayMission, CommandError> {
    let repo = repository(state)?;
    let (selection, completion) = load_today(state, &repo)?;
    let streak = completion_streak(completion.history(), selection.date_key);
    Ok(TodayMission {
        date_key: selection.date_key,
        progress: completion.progress(),
        day_complete: completion.is_day_complete(),
        completed: completion.completed_ids().to_vec(),
        words: selection.words,
        phrase: selection.phrase,
        streak,
    })
}

/// Flip the done flag of one of today's items.
///
/// Holds the repository lock from load to write.
pub fn toggle_item_done(state: &AppState, id: &str) -> Result<ToggleResponse, CommandError> {
    let repo = repository(state)?;
    let (_, mut completion) = load_today(state, &repo)?;
    let outcome = completion.toggle(&*repo, id)?;
    Ok(ToggleResponse {
        id: id.to_string(),
        done: outcome.done,
        day_logged: outcome.day_logged,
        progress: completion.progress(),
    })
}
