//! Deterministic daily study set selection.
//!
//! The seed is a 32-bit rolling hash of the date key's UTF-16 code units
//! (`hash = hash * 31 + unit`, wrapping as a signed 32-bit integer, then made
//! non-negative). Word picks walk a shrinking working copy of the pool with a
//! fixed stride so no word repeats within a day; the phrase slot is drawn
//! independently from the phrase pool.

use crate::content::ContentPool;
use crate::date::DateKey;
use crate::error::{EngineError, Result};
use crate::types::{ContentItem, EngineSettings};
use serde::Serialize;

/// Seed derived from a date key string.
///
/// `"2024-01-01"` hashes to `613341632`.
pub fn date_key_hash(key: &str) -> u32 {
    let hash = key
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs()
}

/// Draw `count` items by stepping `stride` through a working copy that shrinks after each pick.
pub fn rotating_draw<'a>(
    pool: &'a [ContentItem],
    seed: u32,
    count: usize,
    stride: u32,
) -> Result<Vec<&'a ContentItem>> {
    if count > pool.len() {
        return Err(EngineError::OutOfRange {
            requested: count,
            available: pool.len(),
        });
    }

    let mut working: Vec<&ContentItem> = pool.iter().collect();
    let mut picked = Vec::with_capacity(count);
    for i in 0..count as u64 {
        let index = (u64::from(seed) + i * u64::from(stride)) % working.len() as u64;
        picked.push(working.remove(index as usize));
    }
    Ok(picked)
}

/// One day's study set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySelection {
    pub date_key: DateKey,
    pub words: Vec<ContentItem>,
    pub phrase: ContentItem,
}

impl DailySelection {
    /// Words in pick order, followed by the phrase.
    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.words.iter().chain(std::iter::once(&self.phrase))
    }

    pub fn item_ids(&self) -> Vec<String> {
        self.items().map(|item| item.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items().any(|item| item.id == id)
    }
}

/// Picks the words and phrase for a given day.
#[derive(Debug, Clone)]
pub struct DailySelector {
    pub word_count: usize,
    pub word_stride: u32,
    pub phrase_multiplier: u32,
}

impl Default for DailySelector {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}

impl DailySelector {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            word_count: settings.words_per_day as usize,
            word_stride: settings.word_stride,
            phrase_multiplier: settings.phrase_multiplier,
        }
    }

    /// Select the study set for `date_key`. Same key and pool always give the same set.
    pub fn select(&self, pool: &ContentPool, date_key: DateKey) -> Result<DailySelection> {
        let seed = date_key_hash(&date_key.to_string());

        let words = rotating_draw(pool.words(), seed, self.word_count, self.word_stride)?
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();

        let phrases = pool.phrases();
        if phrases.is_empty() {
            return Err(EngineError::OutOfRange {
                requested: 1,
                available: 0,
            });
        }
        let phrase_index = (u64::from(seed) * u64::from(self.phrase_multiplier)) % phrases.len() as u64;
        let phrase = phrases[phrase_index as usize].clone();

        tracing::debug!(%date_key, seed, phrase = %phrase.id, "daily selection derived");

        Ok(DailySelection {
            date_key,
            words,
            phrase,
        })
    }
}
