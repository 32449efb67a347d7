//! Error types for study-core.

use thiserror::Error;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors reported by the selection, scoring and quiz components.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot select {requested} items from a pool of {available}")]
    OutOfRange { requested: usize, available: usize },

    #[error("reference glyph {glyph:?} rendered no ink")]
    DegenerateReference { glyph: String },

    #[error("need {required} distinct glosses, pool has {available}")]
    InsufficientPoolSize { required: usize, available: usize },

    #[error("progress store unavailable: {0}")]
    StorageUnavailable(String),

    #[error("no strokes drawn")]
    InsufficientInput,

    #[error("raster size mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    RasterMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("raster buffer holds {actual} bytes, expected {expected}")]
    RasterLength { expected: usize, actual: usize },

    #[error("no character selected for practice")]
    NoActiveCharacter,

    #[error("no quiz question in progress")]
    NoActiveQuestion,

    #[error("invalid date key: {0}")]
    InvalidDateKey(String),

    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("option {index} out of range ({count} options)")]
    InvalidOption { index: usize, count: usize },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("duplicate content id: {0}")]
    DuplicateId(String),

    #[error("invalid content pool: {0}")]
    Content(#[from] serde_json::Error),
}
