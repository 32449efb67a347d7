//! Static content pool (characters, words, phrases).
//!
//! The pool is decoded once and only read afterwards. Every component borrows it;
//! nothing in this crate mutates an item.

use crate::error::{EngineError, Result};
use crate::types::{CharacterSet, ContentItem, ContentKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const BUILTIN_CONTENT: &str = include_str!("../data/content.json");

/// Entry as stored in the pool JSON; the kind comes from the section it appears in.
#[derive(Debug, Deserialize)]
struct RawEntry {
    id: String,
    script: String,
    #[serde(default)]
    romaji: Option<String>,
    phonetic: String,
    gloss: String,
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    category: Option<String>,
}

impl RawEntry {
    fn into_item(self, kind: ContentKind) -> ContentItem {
        ContentItem {
            id: self.id,
            kind,
            script: self.script,
            romaji: self.romaji,
            phonetic: self.phonetic,
            gloss: self.gloss,
            level: self.level,
            category: self.category,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPool {
    #[serde(default)]
    hiragana: Vec<RawEntry>,
    #[serde(default)]
    katakana: Vec<RawEntry>,
    #[serde(default)]
    words: Vec<RawEntry>,
    #[serde(default)]
    phrases: Vec<RawEntry>,
}

/// Read-only collection of learning content, in pool order.
#[derive(Debug, Clone, Serialize)]
pub struct ContentPool {
    hiragana: Vec<ContentItem>,
    katakana: Vec<ContentItem>,
    words: Vec<ContentItem>,
    phrases: Vec<ContentItem>,
}

impl ContentPool {
    /// Decode the pool bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CONTENT)
    }

    /// Decode a pool from JSON with `hiragana`, `katakana`, `words` and `phrases` arrays.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawPool = serde_json::from_str(json)?;
        let to_items = |entries: Vec<RawEntry>, kind| {
            entries
                .into_iter()
                .map(|e| e.into_item(kind))
                .collect::<Vec<_>>()
        };

        let pool = Self {
            hiragana: to_items(raw.hiragana, ContentKind::Character),
            katakana: to_items(raw.katakana, ContentKind::Character),
            words: to_items(raw.words, ContentKind::Word),
            phrases: to_items(raw.phrases, ContentKind::Phrase),
        };
        pool.check_unique_ids()?;

        tracing::debug!(
            characters = pool.hiragana.len() + pool.katakana.len(),
            words = pool.words.len(),
            phrases = pool.phrases.len(),
            "content pool loaded"
        );
        Ok(pool)
    }

    /// Build a pool directly from item lists (items keep the kind they carry).
    pub fn from_items(
        hiragana: Vec<ContentItem>,
        katakana: Vec<ContentItem>,
        words: Vec<ContentItem>,
        phrases: Vec<ContentItem>,
    ) -> Result<Self> {
        let pool = Self {
            hiragana,
            katakana,
            words,
            phrases,
        };
        pool.check_unique_ids()?;
        Ok(pool)
    }

    fn check_unique_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for item in self.iter() {
            if !seen.insert(item.id.as_str()) {
                return Err(EngineError::DuplicateId(item.id.clone()));
            }
        }
        Ok(())
    }

    pub fn characters(&self, set: CharacterSet) -> &[ContentItem] {
        match set {
            CharacterSet::Hiragana => &self.hiragana,
            CharacterSet::Katakana => &self.katakana,
        }
    }

    pub fn words(&self) -> &[ContentItem] {
        &self.words
    }

    pub fn phrases(&self) -> &[ContentItem] {
        &self.phrases
    }

    /// Iterate over every item in the pool.
    pub fn iter(&self) -> impl Iterator<Item = &ContentItem> {
        self.hiragana
            .iter()
            .chain(&self.katakana)
            .chain(&self.words)
            .chain(&self.phrases)
    }

    /// Look up an item by id.
    pub fn find(&self, id: &str) -> Option<&ContentItem> {
        self.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.hiragana.len() + self.katakana.len() + self.words.len() + self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
