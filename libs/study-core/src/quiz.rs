//! Multiple-choice quiz generation and session scoring.

use crate::content::ContentPool;
use crate::error::{EngineError, Result};
use crate::schedule::PendingAction;
use crate::types::{ContentItem, EngineSettings};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pool a question is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizCategory {
    Word,
    Phrase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub gloss: String,
    pub script: String,
    pub phonetic: String,
}

impl QuizOption {
    fn from_item(item: &ContentItem) -> Self {
        Self {
            gloss: item.gloss.clone(),
            script: item.script.clone(),
            phonetic: item.phonetic.clone(),
        }
    }
}

/// A reading question: show the script, pick the gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub category: QuizCategory,
    pub prompt_id: String,
    pub prompt: String,
    pub phonetic: String,
    pub correct_answer: String,
    pub audio_text: String,
    pub options: Vec<QuizOption>,
}

impl QuizQuestion {
    /// Whether option `index` carries the correct gloss.
    pub fn is_correct(&self, index: usize) -> Result<bool> {
        let option = self.options.get(index).ok_or(EngineError::InvalidOption {
            index,
            count: self.options.len(),
        })?;
        Ok(option.gloss == self.correct_answer)
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.gloss == self.correct_answer)
    }
}

fn distinct_glosses(items: &[ContentItem]) -> usize {
    items
        .iter()
        .map(|item| item.gloss.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Builds questions with unique, shuffled distractors.
#[derive(Debug, Clone)]
pub struct QuizGenerator {
    /// Probability that a question is drawn from the word pool.
    pub word_ratio: f64,
    pub option_count: usize,
}

impl Default for QuizGenerator {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}

impl QuizGenerator {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            word_ratio: settings.quiz_word_ratio,
            option_count: settings.quiz_option_count as usize,
        }
    }

    /// Pick a category, then a question from it.
    pub fn next_question<R: Rng + ?Sized>(&self, pool: &ContentPool, rng: &mut R) -> Result<QuizQuestion> {
        if !self.word_ratio.is_finite() {
            return Err(EngineError::InvalidSettings(format!(
                "quiz word ratio {} is not a finite number",
                self.word_ratio
            )));
        }
        let category = if rng.gen_bool(self.word_ratio.clamp(0.0, 1.0)) {
            QuizCategory::Word
        } else {
            QuizCategory::Phrase
        };
        let items = match category {
            QuizCategory::Word => pool.words(),
            QuizCategory::Phrase => pool.phrases(),
        };
        self.question_from(category, items, rng)
    }

    /// Build a question whose target and distractors all come from `items`.
    pub fn question_from<R: Rng + ?Sized>(
        &self,
        category: QuizCategory,
        items: &[ContentItem],
        rng: &mut R,
    ) -> Result<QuizQuestion> {
        let available = distinct_glosses(items);
        let required = self.option_count.max(1);
        if available < required {
            tracing::warn!(?category, required, available, "pool too small for quiz options");
            return Err(EngineError::InsufficientPoolSize {
                required,
                available,
            });
        }

        let target = items
            .choose(rng)
            .ok_or(EngineError::InsufficientPoolSize {
                required,
                available: 0,
            })?;

        // Rejection sampling terminates: the pool holds at least `required` distinct glosses.
        let mut options = vec![QuizOption::from_item(target)];
        while options.len() < required {
            let candidate = &items[rng.gen_range(0..items.len())];
            if !options.iter().any(|o| o.gloss == candidate.gloss) {
                options.push(QuizOption::from_item(candidate));
            }
        }
        options.shuffle(rng);

        Ok(QuizQuestion {
            category,
            prompt_id: target.id.clone(),
            prompt: target.script.clone(),
            phonetic: target.phonetic.clone(),
            correct_answer: target.gloss.clone(),
            audio_text: target.script.clone(),
            options,
        })
    }
}

/// Points for a correct answer given the combo before it.
pub fn points_for(combo: u32) -> u32 {
    10 + 2 * combo
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizAction {
    NextQuestion,
}

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub awarded: u32,
    pub score: u32,
    pub combo: u32,
}

/// Running quiz with score and combo. Nothing here is persisted.
pub struct QuizSession {
    generator: QuizGenerator,
    score: u32,
    combo: u32,
    current: Option<QuizQuestion>,
    selected: Option<usize>,
    pending: PendingAction<QuizAction>,
    next_question_delay_ms: u32,
}

impl QuizSession {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            generator: QuizGenerator::from_settings(settings),
            score: 0,
            combo: 0,
            current: None,
            selected: None,
            pending: PendingAction::new(),
            next_question_delay_ms: settings.next_question_delay_ms,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.current.as_ref()
    }

    /// Index chosen for the current question, if answered.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.is_pending()
    }

    /// Show a fresh question, discarding any pending transition.
    pub fn start<R: Rng + ?Sized>(&mut self, pool: &ContentPool, rng: &mut R) -> Result<&QuizQuestion> {
        self.pending.cancel();
        self.load_question(pool, rng)
    }

    fn load_question<R: Rng + ?Sized>(&mut self, pool: &ContentPool, rng: &mut R) -> Result<&QuizQuestion> {
        let question = self.generator.next_question(pool, rng)?;
        self.selected = None;
        Ok(&*self.current.insert(question))
    }

    /// Answer the current question. A question already answered ignores further picks.
    pub fn answer(&mut self, index: usize, now: DateTime<Utc>) -> Result<Option<AnswerOutcome>> {
        let question = self.current.as_ref().ok_or(EngineError::NoActiveQuestion)?;
        if self.selected.is_some() {
            return Ok(None);
        }
        let correct = question.is_correct(index)?;
        let correct_answer = question.correct_answer.clone();

        let awarded = if correct {
            let points = points_for(self.combo);
            self.score = self.score.saturating_add(points);
            self.combo += 1;
            points
        } else {
            self.combo = 0;
            0
        };
        self.selected = Some(index);
        self.pending
            .schedule(QuizAction::NextQuestion, now, self.next_question_delay_ms);

        Ok(Some(AnswerOutcome {
            correct,
            correct_answer,
            awarded,
            score: self.score,
            combo: self.combo,
        }))
    }

    /// Load the next question once the display delay has elapsed.
    pub fn poll<R: Rng + ?Sized>(
        &mut self,
        pool: &ContentPool,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Option<&QuizQuestion>> {
        match self.pending.take_due(now) {
            Some(QuizAction::NextQuestion) => self.load_question(pool, rng).map(Some),
            None => Ok(None),
        }
    }

    /// Drop any pending transition, e.g. when the quiz view closes.
    pub fn cancel(&mut self) {
        self.pending.cancel();
    }
}
