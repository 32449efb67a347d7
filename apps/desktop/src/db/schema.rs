//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for local SQLite database.
pub const SCHEMA: &str = r#"
-- Progress store entries (JSON values keyed by name)
CREATE TABLE IF NOT EXISTS progress_entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Engine settings, serialized as JSON
CREATE TABLE IF NOT EXISTS engine_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    settings_json TEXT NOT NULL DEFAULT '{}'
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
"#;

/// Initialize engine settings if not exists.
pub const INIT_ENGINE_SETTINGS: &str = r#"
INSERT OR IGNORE INTO engine_settings (id) VALUES (1);
"#;
