//! Common test utilities and fixtures for integration tests.

pub mod fixtures;

use chrono::{DateTime, Duration, TimeZone, Utc};
use nihongo_daily_lib::db::SqliteRepository;
use nihongo_daily_lib::state::{AppState, Clock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use study_core::ContentPool;

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn advance_ms(&self, ms: i64) {
        let mut now = self.now.lock().unwrap();
        *now = *now + Duration::milliseconds(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Test context with an in-memory database, seeded randomness and a manual clock.
pub struct TestContext {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
}

impl TestContext {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()),
        });
        let repository = SqliteRepository::open_in_memory().expect("open in-memory database");
        let pool = ContentPool::builtin().expect("builtin content pool");
        let state = AppState::with_parts(repository, pool, StdRng::seed_from_u64(17), clock.clone())
            .expect("build app state");
        Self { state, clock }
    }
}
