//! Core study engine shared by the desktop application.
//!
//! Provides:
//! - Date-seeded daily selection of words and a phrase
//! - Completion tracking, history calendar and favorites over a key-value store
//! - Trace scoring of drawn characters with a mastery streak
//! - Multiple-choice quiz generation with combo scoring
//! - Shared types (ContentItem, EngineSettings, DateKey, etc.)

pub mod calendar;
pub mod content;
pub mod daily;
pub mod date;
pub mod error;
pub mod progress;
pub mod quiz;
pub mod schedule;
pub mod trace;
pub mod types;

pub use calendar::{completion_streak, month_calendar, CalendarDay, MonthCalendar};
pub use content::ContentPool;
pub use daily::{date_key_hash, rotating_draw, DailySelection, DailySelector};
pub use date::DateKey;
pub use error::{EngineError, Result};
pub use progress::{
    load_history, today_done_key, CompletionState, DayProgress, Favorites, MemoryProgressStore, ProgressStore,
    ToggleOutcome, COMPLETION_HISTORY_KEY, TODAY_DONE_PREFIX,
};
pub use quiz::{
    points_for, AnswerOutcome, QuizAction, QuizCategory, QuizGenerator, QuizOption, QuizQuestion,
    QuizSession,
};
pub use schedule::PendingAction;
pub use trace::{
    tally_pixels, AccuracyResult, AlphaRaster, GlyphRenderer, PixelTally, PracticeEvent, Point,
    ScoringRules, TraceAction, TracePractice, TraceScorer,
};
pub use types::{CharacterSet, ContentItem, ContentKind, EngineSettings};
