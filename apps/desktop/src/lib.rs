pub mod commands;
pub mod db;
pub mod playback;
pub mod state;

use db::SqliteRepository;
use state::AppState;
use std::path::PathBuf;
use study_core::ContentPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("NIHONGO_DB_PATH") {
        return PathBuf::from(path);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nihongo-daily")
        .join("progress.db")
}

/// Open the store, build the state and print today's mission as JSON.
pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Ensure data directory exists
    let db_path = get_db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %db_path.display(), "opening progress database");
    let repository = SqliteRepository::open(&db_path)?;
    let pool = ContentPool::builtin()?;
    let app_state = AppState::new(repository, pool)?;

    let mission = commands::get_today_mission(&app_state)
        .map_err(|e| anyhow::anyhow!(e.message))?;
    tracing::info!(
        date_key = %mission.date_key,
        completed = mission.progress.completed,
        required = mission.progress.required,
        streak = mission.streak,
        "today's mission loaded"
    );
    println!("{}", serde_json::to_string_pretty(&mission)?);
    Ok(())
}
