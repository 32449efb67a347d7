//! Audio playback lock commands.
//!
//! Speech synthesis happens in the frontend; these commands only guard against
//! overlapping requests.

use super::CommandError;
use crate::state::AppState;
use study_core::EngineError;

/// Granted playback request.
#[derive(Debug, serde::Serialize)]
pub struct PlaybackTicket {
    pub id: String,
    /// Text to synthesize.
    pub text: String,
}

/// Claim playback of an item's audio.
pub fn request_playback(state: &AppState, id: &str) -> Result<PlaybackTicket, CommandError> {
    let item = state
        .pool
        .find(id)
        .ok_or_else(|| EngineError::UnknownItem(id.to_string()))?;
    state.playback.acquire(id)?;
    Ok(PlaybackTicket {
        id: id.to_string(),
        text: item.script.clone(),
    })
}

/// Release playback once audio ended or failed.
pub fn finish_playback(state: &AppState, id: &str) -> Result<bool, CommandError> {
    state.playback.release(id).map_err(Into::into)
}
