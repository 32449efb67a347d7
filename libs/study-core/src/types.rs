//! Core types shared by the study components.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Kind of learning content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Character,
    Word,
    Phrase,
}

impl ContentKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Word => "word",
            Self::Phrase => "phrase",
        }
    }
}

/// Character sets available for tracing practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterSet {
    Hiragana,
    Katakana,
}

impl Default for CharacterSet {
    fn default() -> Self {
        Self::Hiragana
    }
}

impl CharacterSet {
    /// Get the set name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hiragana => "hiragana",
            Self::Katakana => "katakana",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hiragana" => Some(Self::Hiragana),
            "katakana" => Some(Self::Katakana),
            _ => None,
        }
    }
}

/// Immutable content record from the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub kind: ContentKind,
    /// Text in the target script.
    pub script: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub romaji: Option<String>,
    /// Phonetic transcription in the learner's script.
    pub phonetic: String,
    /// Native-language gloss.
    pub gloss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Tunables for selection, scoring and quiz behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub words_per_day: u32,
    pub word_stride: u32,
    pub phrase_multiplier: u32,
    pub pass_threshold: f64,
    pub wrong_ink_penalty: f64,
    pub ink_alpha_threshold: u8,
    pub mastery_target: u32,
    pub surface_width: u32,
    pub surface_height: u32,
    pub glyph_font_px: u32,
    pub stroke_width: f32,
    pub quiz_word_ratio: f64,
    pub quiz_option_count: u32,
    pub clear_delay_ms: u32,
    pub advance_delay_ms: u32,
    pub next_question_delay_ms: u32,
    pub daily_reset_hour: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            words_per_day: 3,
            word_stride: 13,
            phrase_multiplier: 7,
            pass_threshold: 0.4,
            wrong_ink_penalty: 0.1,
            ink_alpha_threshold: 10,
            mastery_target: 3,
            surface_width: 320,
            surface_height: 320,
            glyph_font_px: 240,
            stroke_width: 14.0,
            quiz_word_ratio: 0.6,
            quiz_option_count: 4,
            clear_delay_ms: 500,
            advance_delay_ms: 2000,
            next_question_delay_ms: 1800,
            daily_reset_hour: 0,
        }
    }
}

impl EngineSettings {
    /// Number of items in a full daily selection (words plus the phrase).
    pub fn daily_item_count(&self) -> usize {
        self.words_per_day as usize + 1
    }

    /// Reject values that would make selection, scoring or the quiz ill-defined.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(EngineError::InvalidSettings(msg.to_string()));
        if self.daily_reset_hour > 23 {
            return invalid("daily_reset_hour must be 0-23");
        }
        if self.mastery_target == 0 {
            return invalid("mastery_target must be at least 1");
        }
        if self.quiz_option_count < 2 {
            return invalid("quiz_option_count must be at least 2");
        }
        if !(0.0..=1.0).contains(&self.quiz_word_ratio) {
            return invalid("quiz_word_ratio must be within 0-1");
        }
        if !self.pass_threshold.is_finite() || !self.wrong_ink_penalty.is_finite() {
            return invalid("scoring values must be finite");
        }
        if self.surface_width == 0 || self.surface_height == 0 {
            return invalid("surface must not be empty");
        }
        if !(self.stroke_width > 0.0) {
            return invalid("stroke_width must be positive");
        }
        Ok(())
    }
}
