//! Application state.

use crate::db::{DbError, SettingsRepository, SqliteRepository};
use crate::playback::PlaybackLock;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use study_core::{ContentPool, QuizSession, TracePractice};

/// Source of the current instant for timed transitions and date keys.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Global application state.
pub struct AppState {
    pub repository: Arc<Mutex<SqliteRepository>>,
    pub pool: Arc<ContentPool>,
    pub trace: Mutex<Option<TracePractice>>,
    pub quiz: Mutex<Option<QuizSession>>,
    pub rng: Mutex<StdRng>,
    pub playback: PlaybackLock,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(repository: SqliteRepository, pool: ContentPool) -> Result<Self, DbError> {
        Self::with_parts(repository, pool, StdRng::from_entropy(), Arc::new(SystemClock))
    }

    /// Build state with an explicit random source and clock.
    pub fn with_parts(
        repository: SqliteRepository,
        pool: ContentPool,
        rng: StdRng,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DbError> {
        // Unreadable settings surface at startup.
        repository.get_engine_settings()?;
        Ok(Self {
            repository: Arc::new(Mutex::new(repository)),
            pool: Arc::new(pool),
            trace: Mutex::new(None),
            quiz: Mutex::new(None),
            rng: Mutex::new(rng),
            playback: PlaybackLock::new(),
            clock,
        })
    }
}
