//! Lock-by-identifier for audio playback requests.

use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("already playing {0}")]
    Busy(String),

    #[error("playback lock poisoned")]
    Poisoned,
}

/// At most one identifier plays at a time.
#[derive(Debug, Default)]
pub struct PlaybackLock {
    current: Mutex<Option<String>>,
}

impl PlaybackLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim playback for `id`. Fails while anything, including `id` itself, is playing.
    pub fn acquire(&self, id: &str) -> Result<(), PlaybackError> {
        let mut current = self.current.lock().map_err(|_| PlaybackError::Poisoned)?;
        if let Some(playing) = current.as_ref() {
            tracing::debug!(requested = id, playing = %playing, "playback request rejected");
            return Err(PlaybackError::Busy(playing.clone()));
        }
        *current = Some(id.to_string());
        Ok(())
    }

    /// Release playback held by `id`; returns false if `id` was not the holder.
    pub fn release(&self, id: &str) -> Result<bool, PlaybackError> {
        let mut current = self.current.lock().map_err(|_| PlaybackError::Poisoned)?;
        if current.as_deref() == Some(id) {
            *current = None;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn playing(&self) -> Result<Option<String>, PlaybackError> {
        let current = self.current.lock().map_err(|_| PlaybackError::Poisoned)?;
        Ok(current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_request_rejected() {
        let lock = PlaybackLock::new();
        lock.acquire("w1_1").unwrap();
        assert_eq!(lock.acquire("w1_1"), Err(PlaybackError::Busy("w1_1".to_string())));
        assert_eq!(lock.acquire("p1_1"), Err(PlaybackError::Busy("w1_1".to_string())));
    }

    #[test]
    fn test_release_only_by_holder() {
        let lock = PlaybackLock::new();
        lock.acquire("w1_1").unwrap();
        assert!(!lock.release("p1_1").unwrap());
        assert_eq!(lock.playing().unwrap().as_deref(), Some("w1_1"));
        assert!(lock.release("w1_1").unwrap());
        assert_eq!(lock.playing().unwrap(), None);
        lock.acquire("p1_1").unwrap();
    }
}
