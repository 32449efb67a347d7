//! Character tracing commands.
//!
//! The frontend owns fonts, so grading receives the reference glyph's alpha
//! channel rendered at the surface size.

use super::{current_settings, lock, repository, CommandError};
use crate::state::AppState;
use study_core::{
    AccuracyResult, AlphaRaster, CharacterSet, ContentItem, EngineError, GlyphRenderer,
    PracticeEvent, Point, TraceAction, TracePractice, TraceScorer,
};

/// Snapshot of the practice session for display.
#[derive(Debug, serde::Serialize)]
pub struct TraceView {
    pub set: CharacterSet,
    pub characters: Vec<ContentItem>,
    pub active: Option<ContentItem>,
    pub streak: u32,
    pub mastery_target: u32,
    pub pending: Option<TraceAction>,
    pub last_result: Option<AccuracyResult>,
    pub stroke_count: usize,
}

impl From<&TracePractice> for TraceView {
    fn from(practice: &TracePractice) -> Self {
        Self {
            set: practice.set(),
            characters: practice.characters().to_vec(),
            active: practice.active().cloned(),
            streak: practice.streak(),
            mastery_target: practice.mastery_target(),
            pending: practice.pending(),
            last_result: practice.last_result().copied(),
            stroke_count: practice.strokes().len(),
        }
    }
}

/// Reference raster rendered by the frontend for one glyph.
struct PrerenderedGlyph {
    glyph: String,
    raster: AlphaRaster,
}

impl GlyphRenderer for PrerenderedGlyph {
    fn render(&self, glyph: &str, _width: u32, _height: u32, _font_px: u32) -> study_core::Result<AlphaRaster> {
        if glyph != self.glyph {
            return Err(EngineError::UnknownItem(glyph.to_string()));
        }
        Ok(self.raster.clone())
    }
}

fn with_practice<T>(
    state: &AppState,
    f: impl FnOnce(&mut TracePractice) -> Result<T, CommandError>,
) -> Result<T, CommandError> {
    let mut trace = lock(&state.trace)?;
    let practice = trace.as_mut().ok_or(EngineError::NoActiveCharacter)?;
    f(practice)
}

/// Open practice for a character set. Replaces any running session.
pub fn start_trace(state: &AppState, set: CharacterSet) -> Result<TraceView, CommandError> {
    let settings = {
        let repo = repository(state)?;
        current_settings(&repo)?
    };
    let practice = TracePractice::new(&state.pool, set, &settings);
    let view = TraceView::from(&practice);
    *lock(&state.trace)? = Some(practice);
    Ok(view)
}

pub fn get_trace_view(state: &AppState) -> Result<Option<TraceView>, CommandError> {
    let trace = lock(&state.trace)?;
    Ok(trace.as_ref().map(TraceView::from))
}

/// Make a character active, resetting the streak.
pub fn select_character(state: &AppState, id: &str) -> Result<TraceView, CommandError> {
    with_practice(state, |practice| {
        practice.select(id)?;
        Ok(TraceView::from(&*practice))
    })
}

pub fn begin_stroke(state: &AppState, x: f32, y: f32) -> Result<(), CommandError> {
    with_practice(state, |practice| {
        practice.begin_stroke(Point::new(x, y));
        Ok(())
    })
}

pub fn extend_stroke(state: &AppState, x: f32, y: f32) -> Result<(), CommandError> {
    with_practice(state, |practice| {
        practice.extend_stroke(Point::new(x, y));
        Ok(())
    })
}

pub fn end_stroke(state: &AppState) -> Result<(), CommandError> {
    with_practice(state, |practice| {
        practice.end_stroke();
        Ok(())
    })
}

/// Wipe the drawing surface.
pub fn clear_drawing(state: &AppState) -> Result<(), CommandError> {
    with_practice(state, |practice| {
        practice.clear_surface();
        Ok(())
    })
}

/// Grade the current drawing against the reference alpha channel.
///
/// Scoring uses the settings the session was started with.
pub fn grade_trace(state: &AppState, reference_alpha: Vec<u8>) -> Result<AccuracyResult, CommandError> {
    let now = state.clock.now();
    with_practice(state, |practice| {
        let glyph = practice
            .active()
            .map(|c| c.script.clone())
            .ok_or(EngineError::NoActiveCharacter)?;
        let settings = practice.settings().clone();
        let raster = AlphaRaster::from_alpha(settings.surface_width, settings.surface_height, reference_alpha)?;
        let scorer = TraceScorer::new(PrerenderedGlyph { glyph, raster }, &settings);
        practice.grade(&scorer, now).map_err(Into::into)
    })
}

/// Fire the pending clear or advance if it is due.
pub fn poll_trace(state: &AppState) -> Result<Option<PracticeEvent>, CommandError> {
    let now = state.clock.now();
    let mut trace = lock(&state.trace)?;
    let Some(practice) = trace.as_mut() else {
        return Ok(None);
    };
    let event = practice.poll(now);
    if event == Some(PracticeEvent::Finished) {
        tracing::info!(set = practice.set().as_str(), "character set finished");
    }
    Ok(event)
}

/// Close practice, dropping anything pending.
pub fn leave_trace(state: &AppState) -> Result<(), CommandError> {
    *lock(&state.trace)? = None;
    Ok(())
}
