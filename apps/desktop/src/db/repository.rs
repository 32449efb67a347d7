//! Repository pattern for database access.

use crate::db::error::DbError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use study_core::{EngineSettings, ProgressStore};

type Result<T> = std::result::Result<T, DbError>;

/// Repository for raw progress entries.
pub trait EntryRepository {
    fn get_entry(&self, key: &str) -> Result<Option<String>>;
    fn set_entry(&self, key: &str, value: &str) -> Result<()>;
    fn entry_keys(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Repository for settings operations.
pub trait SettingsRepository {
    fn get_engine_settings(&self) -> Result<EngineSettings>;
    fn save_engine_settings(&self, settings: &EngineSettings) -> Result<()>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn
            .execute_batch(super::schema::INIT_ENGINE_SETTINGS)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }
}

impl EntryRepository for SqliteRepository {
    fn get_entry(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM progress_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn set_entry(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO progress_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn entry_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM progress_entries WHERE substr(key, 1, ?2) = ?1 ORDER BY key")?;
        let keys = stmt
            .query_map(params![prefix, prefix.chars().count() as i64], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }
}

impl ProgressStore for SqliteRepository {
    fn get(&self, key: &str) -> study_core::Result<Option<String>> {
        self.get_entry(key).map_err(Into::into)
    }

    fn set(&self, key: &str, value: &str) -> study_core::Result<()> {
        self.set_entry(key, value).map_err(Into::into)
    }
}

impl SettingsRepository for SqliteRepository {
    fn get_engine_settings(&self) -> Result<EngineSettings> {
        let raw: String = self.conn.query_row(
            "SELECT settings_json FROM engine_settings WHERE id = 1",
            [],
            |row| row.get(0),
        )?;
        let settings: EngineSettings = serde_json::from_str(&raw)?;
        settings
            .validate()
            .map_err(|e| DbError::InvalidData(e.to_string()))?;
        Ok(settings)
    }

    fn save_engine_settings(&self, settings: &EngineSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| DbError::InvalidData(e.to_string()))?;
        let raw = serde_json::to_string(settings)?;
        self.conn.execute(
            "UPDATE engine_settings SET settings_json = ?1 WHERE id = 1",
            params![raw],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entry_round_trip() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.get_entry("missing").unwrap(), None);

        repo.set_entry("favorites", "[\"w1_1\"]").unwrap();
        repo.set_entry("favorites", "[]").unwrap();
        assert_eq!(repo.get_entry("favorites").unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_entry_keys_by_prefix() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.set_entry("today_done_2024-01-02", "[]").unwrap();
        repo.set_entry("today_done_2024-01-01", "[]").unwrap();
        repo.set_entry("completion_history", "[]").unwrap();

        let keys = repo.entry_keys("today_done_").unwrap();
        assert_eq!(keys, vec!["today_done_2024-01-01", "today_done_2024-01-02"]);
    }

    #[test]
    fn test_default_settings() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.get_engine_settings().unwrap(), EngineSettings::default());
    }

    #[test]
    fn test_save_settings() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let settings = EngineSettings {
            daily_reset_hour: 4,
            mastery_target: 5,
            ..Default::default()
        };
        repo.save_engine_settings(&settings).unwrap();
        assert_eq!(repo.get_engine_settings().unwrap(), settings);
    }

    #[test]
    fn test_reject_invalid_settings() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let settings = EngineSettings {
            daily_reset_hour: 30,
            ..Default::default()
        };
        assert!(matches!(
            repo.save_engine_settings(&settings),
            Err(DbError::InvalidData(_))
        ));
        assert_eq!(repo.get_engine_settings().unwrap().daily_reset_hour, 0);
    }

    #[test]
    fn test_progress_store_impl() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let store: &dyn ProgressStore = &repo;
        store.set("completion_history", "[\"2024-01-01\"]").unwrap();
        assert_eq!(
            store.get("completion_history").unwrap().as_deref(),
            Some("[\"2024-01-01\"]")
        );
    }
}
