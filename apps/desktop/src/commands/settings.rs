//! Settings commands.

use super::{repository, CommandError};
use crate::db::SettingsRepository;
use crate::state::AppState;
use study_core::EngineSettings;

/// Get engine settings.
pub fn get_engine_settings(state: &AppState) -> Result<EngineSettings, CommandError> {
    let repo = repository(state)?;
    repo.get_engine_settings().map_err(Into::into)
}

/// Save engine settings. Running trace and quiz sessions keep their settings until restarted.
pub fn save_engine_settings(state: &AppState, settings: EngineSettings) -> Result<(), CommandError> {
    let repo = repository(state)?;
    repo.save_engine_settings(&settings)?;
    tracing::info!(daily_reset_hour = settings.daily_reset_hour, "engine settings saved");
    Ok(())
}
