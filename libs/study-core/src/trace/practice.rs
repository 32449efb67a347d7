//! Tracing practice session with the mastery streak.
//!
//! Each passing attempt on the active character extends the streak. The pass that
//! reaches the mastery target schedules an advance to the next character; every
//! other grade schedules a surface clear. Switching characters resets the streak,
//! drops the last result and cancels anything pending.

use super::raster::{AlphaRaster, Point};
use super::scorer::{AccuracyResult, GlyphRenderer, TraceScorer};
use crate::content::ContentPool;
use crate::error::{EngineError, Result};
use crate::schedule::PendingAction;
use crate::types::{CharacterSet, ContentItem, EngineSettings};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Delayed transitions owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceAction {
    ClearSurface,
    Advance,
}

/// What a fired action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PracticeEvent {
    SurfaceCleared,
    Advanced { character_id: String },
    /// Advanced past the last character; practice mode exited.
    Finished,
}

pub struct TracePractice {
    set: CharacterSet,
    characters: Vec<ContentItem>,
    active: Option<usize>,
    streak: u32,
    mastery_target: u32,
    strokes: Vec<Vec<Point>>,
    drawing: bool,
    last_result: Option<AccuracyResult>,
    pending: PendingAction<TraceAction>,
    stroke_width: f32,
    clear_delay_ms: u32,
    advance_delay_ms: u32,
    /// Settings in force when the session started.
    settings: EngineSettings,
}

impl TracePractice {
    pub fn new(pool: &ContentPool, set: CharacterSet, settings: &EngineSettings) -> Self {
        Self {
            set,
            characters: pool.characters(set).to_vec(),
            active: None,
            streak: 0,
            mastery_target: settings.mastery_target,
            strokes: Vec::new(),
            drawing: false,
            last_result: None,
            pending: PendingAction::new(),
            stroke_width: settings.stroke_width,
            clear_delay_ms: settings.clear_delay_ms,
            advance_delay_ms: settings.advance_delay_ms,
            settings: settings.clone(),
        }
    }

    pub fn set(&self) -> CharacterSet {
        self.set
    }

    pub fn characters(&self) -> &[ContentItem] {
        &self.characters
    }

    pub fn active(&self) -> Option<&ContentItem> {
        self.active.map(|i| &self.characters[i])
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn mastery_target(&self) -> u32 {
        self.mastery_target
    }

    pub fn last_result(&self) -> Option<&AccuracyResult> {
        self.last_result.as_ref()
    }

    pub fn strokes(&self) -> &[Vec<Point>] {
        &self.strokes
    }

    /// Settings the session was started with; later saves do not affect it.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn pending(&self) -> Option<TraceAction> {
        self.pending.pending().copied()
    }

    /// Make `id` the active character.
    pub fn select(&mut self, id: &str) -> Result<&ContentItem> {
        let index = self
            .characters
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| EngineError::UnknownItem(id.to_string()))?;
        self.activate(Some(index));
        Ok(&self.characters[index])
    }

    /// Exit practice mode.
    pub fn leave(&mut self) {
        self.activate(None);
    }

    fn activate(&mut self, index: Option<usize>) {
        self.active = index;
        self.streak = 0;
        self.last_result = None;
        self.strokes.clear();
        self.drawing = false;
        self.pending.cancel();
    }

    pub fn begin_stroke(&mut self, point: Point) {
        if self.active.is_none() {
            return;
        }
        self.drawing = true;
        self.strokes.push(vec![point]);
    }

    pub fn extend_stroke(&mut self, point: Point) {
        if !self.drawing {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(point);
        }
    }

    pub fn end_stroke(&mut self) {
        self.drawing = false;
    }

    /// Wipe the drawing surface.
    pub fn clear_surface(&mut self) {
        self.strokes.clear();
        self.drawing = false;
    }

    /// Rasterize the accumulated strokes.
    pub fn rasterize(&self, width: u32, height: u32) -> AlphaRaster {
        let mut raster = AlphaRaster::blank(width, height);
        for stroke in &self.strokes {
            raster.paint_stroke(stroke, self.stroke_width);
        }
        raster
    }

    /// Score the current drawing against the active character.
    pub fn grade<R: GlyphRenderer>(
        &mut self,
        scorer: &TraceScorer<R>,
        now: DateTime<Utc>,
    ) -> Result<AccuracyResult> {
        let index = self.active.ok_or(EngineError::NoActiveCharacter)?;
        if self.strokes.iter().all(|s| s.is_empty()) {
            return Err(EngineError::InsufficientInput);
        }

        let (width, height) = scorer.surface_size();
        let raster = self.rasterize(width, height);
        let result = scorer.score(&self.characters[index].script, &raster)?;
        self.last_result = Some(result);
        self.drawing = false;

        let advance_pending = self.pending() == Some(TraceAction::Advance);
        if result.passed && self.streak < self.mastery_target {
            self.streak += 1;
        }

        // Once mastered, the scheduled advance is left untouched.
        if advance_pending {
            return Ok(result);
        }
        if self.streak >= self.mastery_target {
            tracing::info!(character = %self.characters[index].id, "character mastered");
            self.pending
                .schedule(TraceAction::Advance, now, self.advance_delay_ms);
        } else {
            self.pending
                .schedule(TraceAction::ClearSurface, now, self.clear_delay_ms);
        }

        Ok(result)
    }

    /// Fire the pending action if it is due.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<PracticeEvent> {
        match self.pending.take_due(now)? {
            TraceAction::ClearSurface => {
                self.clear_surface();
                Some(PracticeEvent::SurfaceCleared)
            }
            TraceAction::Advance => Some(self.advance()),
        }
    }

    fn advance(&mut self) -> PracticeEvent {
        let next = self.active.map(|i| i + 1).filter(|&i| i < self.characters.len());
        self.activate(next);
        match next {
            Some(i) => PracticeEvent::Advanced {
                character_id: self.characters[i].id.clone(),
            },
            None => PracticeEvent::Finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::scorer::RectRenderer;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    fn scorer() -> TraceScorer<RectRenderer> {
        TraceScorer::new(
            RectRenderer {
                x0: 100,
                y0: 100,
                x1: 220,
                y1: 220,
            },
            &EngineSettings::default(),
        )
    }

    fn practice() -> TracePractice {
        let pool = ContentPool::builtin().unwrap();
        TracePractice::new(&pool, CharacterSet::Hiragana, &EngineSettings::default())
    }

    /// Horizontal passes covering most of the reference block.
    fn draw_good(p: &mut TracePractice) {
        for row in 0..8 {
            let y = 107.0 + 14.0 * row as f32;
            p.begin_stroke(Point::new(107.0, y));
            p.extend_stroke(Point::new(213.0, y));
            p.end_stroke();
        }
    }

    fn draw_bad(p: &mut TracePractice) {
        p.begin_stroke(Point::new(10.0, 10.0));
        p.extend_stroke(Point::new(60.0, 10.0));
        p.end_stroke();
    }

    #[test]
    fn good_attempt_passes() {
        let mut p = practice();
        p.select("h1").unwrap();
        draw_good(&mut p);
        let result = p.grade(&scorer(), t0()).unwrap();
        assert!(result.passed, "accuracy {}", result.accuracy);
        assert!(result.accuracy > 0.8);
        assert_eq!(p.streak(), 1);
        assert_eq!(p.pending(), Some(TraceAction::ClearSurface));
    }

    #[test]
    fn stray_attempt_fails_without_streak() {
        let mut p = practice();
        p.select("h1").unwrap();
        draw_bad(&mut p);
        let result = p.grade(&scorer(), t0()).unwrap();
        assert!(!result.passed);
        assert_eq!(result.accuracy, 0.0);
        assert_eq!(p.streak(), 0);
    }

    #[test]
    fn empty_drawing_is_insufficient_input() {
        let mut p = practice();
        p.select("h1").unwrap();
        let result = p.grade(&scorer(), t0());
        assert!(matches!(result, Err(EngineError::InsufficientInput)));
        assert!(p.last_result().is_none());
        assert!(p.pending().is_none());
    }

    #[test]
    fn grading_without_character_fails() {
        let mut p = practice();
        draw_good(&mut p);
        let result = p.grade(&scorer(), t0());
        assert!(matches!(result, Err(EngineError::NoActiveCharacter)));
    }

    #[test]
    fn surface_clears_after_delay() {
        let mut p = practice();
        p.select("h1").unwrap();
        draw_bad(&mut p);
        p.grade(&scorer(), t0()).unwrap();
        assert_eq!(p.poll(t0() + Duration::milliseconds(400)), None);
        assert!(!p.strokes().is_empty());
        assert_eq!(
            p.poll(t0() + Duration::milliseconds(500)),
            Some(PracticeEvent::SurfaceCleared)
        );
        assert!(p.strokes().is_empty());
        // Result stays visible after the clear.
        assert!(p.last_result().is_some());
    }

    #[test]
    fn switching_character_resets_streak() {
        let mut p = practice();
        let s = scorer();
        p.select("h1").unwrap();
        for _ in 0..2 {
            draw_good(&mut p);
            p.grade(&s, t0()).unwrap();
            p.clear_surface();
        }
        assert_eq!(p.streak(), 2);

        p.select("h5").unwrap();
        assert_eq!(p.streak(), 0);
        assert!(p.last_result().is_none());
        assert!(p.pending().is_none());
    }

    #[test]
    fn three_passes_advance_exactly_once() {
        let mut p = practice();
        let s = scorer();
        p.select("h1").unwrap();
        let mut now = t0();
        for _ in 0..3 {
            draw_good(&mut p);
            p.grade(&s, now).unwrap();
            now = now + Duration::milliseconds(600);
            let _ = p.poll(now);
        }
        // Third pass scheduled the advance instead of a clear.
        assert_eq!(p.streak(), 3);
        assert_eq!(p.pending(), Some(TraceAction::Advance));

        // Grading again while mastered does not reschedule or extend the streak.
        draw_good(&mut p);
        p.grade(&s, now).unwrap();
        assert_eq!(p.streak(), 3);

        let fired = p.poll(now + Duration::milliseconds(5000));
        assert_eq!(
            fired,
            Some(PracticeEvent::Advanced {
                character_id: "h2".to_string()
            })
        );
        assert_eq!(p.poll(now + Duration::milliseconds(10_000)), None);
        assert_eq!(p.active().map(|c| c.id.as_str()), Some("h2"));
        assert_eq!(p.streak(), 0);
        assert!(p.strokes().is_empty());
    }

    #[test]
    fn advancing_past_last_character_finishes() {
        let mut p = practice();
        let s = scorer();
        p.select("h20").unwrap();
        for _ in 0..3 {
            draw_good(&mut p);
            p.grade(&s, t0()).unwrap();
        }
        let fired = p.poll(t0() + Duration::milliseconds(2000));
        assert_eq!(fired, Some(PracticeEvent::Finished));
        assert!(p.active().is_none());
    }

    #[test]
    fn leaving_cancels_pending_advance() {
        let mut p = practice();
        let s = scorer();
        p.select("h1").unwrap();
        for _ in 0..3 {
            draw_good(&mut p);
            p.grade(&s, t0()).unwrap();
        }
        p.leave();
        assert_eq!(p.poll(t0() + Duration::milliseconds(5000)), None);
        assert!(p.active().is_none());
    }

    #[test]
    fn unknown_character_rejected() {
        let mut p = practice();
        assert!(matches!(p.select("k1"), Err(EngineError::UnknownItem(_))));
    }

    #[test]
    fn strokes_ignored_without_active_character() {
        let mut p = practice();
        p.begin_stroke(Point::new(1.0, 1.0));
        p.extend_stroke(Point::new(2.0, 2.0));
        assert!(p.strokes().is_empty());
    }
}
