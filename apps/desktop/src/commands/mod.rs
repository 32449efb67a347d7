//! Commands exposed to the frontend.
//!
//! Every command takes the shared [`AppState`] and returns `Result<T, CommandError>`.

pub mod audio;
pub mod favorites;
pub mod quiz;
pub mod settings;
pub mod stats;
pub mod today;
pub mod trace;

use crate::db::{DbError, SettingsRepository, SqliteRepository};
use crate::playback::PlaybackError;
use crate::state::AppState;
use std::sync::{Mutex, MutexGuard};
use study_core::{EngineError, EngineSettings};

pub use audio::{finish_playback, request_playback, PlaybackTicket};
pub use favorites::{list_favorites, toggle_favorite};
pub use quiz::{answer_quiz, get_quiz_score, poll_quiz, start_quiz, stop_quiz, QuizScore};
pub use settings::{get_engine_settings, save_engine_settings};
pub use stats::{get_month_calendar, get_streak_stats, StreakStats};
pub use today::{get_today_mission, toggle_item_done, TodayMission, ToggleResponse};
pub use trace::{
    begin_stroke, clear_drawing, end_stroke, extend_stroke, get_trace_view, grade_trace, leave_trace,
    poll_trace, select_character, start_trace, TraceView,
};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl From<DbError> for CommandError {
    fn from(e: DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<EngineError> for CommandError {
    fn from(e: EngineError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<PlaybackError> for CommandError {
    fn from(e: PlaybackError) -> Self {
        Self { message: e.to_string() }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, CommandError> {
    mutex.lock().map_err(|_| CommandError {
        message: "state lock poisoned".to_string(),
    })
}

pub(crate) fn current_settings(repo: &SqliteRepository) -> Result<EngineSettings, CommandError> {
    repo.get_engine_settings().map_err(Into::into)
}

pub(crate) fn repository(state: &AppState) -> Result<MutexGuard<'_, SqliteRepository>, CommandError> {
    lock(&state.repository)
}
