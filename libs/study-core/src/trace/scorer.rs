//! Pixel-level comparison of a traced attempt against a rendered reference glyph.

use super::raster::AlphaRaster;
use crate::error::{EngineError, Result};
use crate::types::EngineSettings;
use serde::{Deserialize, Serialize};

/// Renders reference glyphs; supplied by the host, which owns fonts.
pub trait GlyphRenderer {
    /// Render `glyph` as filled text of `font_px` size centered on a `width` x `height`
    /// raster and return its alpha channel.
    fn render(&self, glyph: &str, width: u32, height: u32, font_px: u32) -> Result<AlphaRaster>;
}

/// Pixel counts from one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelTally {
    /// Reference ink pixels.
    pub target: usize,
    /// Reference ink pixels also inked by the user.
    pub matching: usize,
    /// User ink outside the reference mask.
    pub wrong: usize,
}

/// Count target, matching and wrong pixels in a single pass.
pub fn tally_pixels(reference: &AlphaRaster, user: &AlphaRaster, threshold: u8) -> Result<PixelTally> {
    if !reference.same_size(user) {
        return Err(EngineError::RasterMismatch {
            expected_width: reference.width(),
            expected_height: reference.height(),
            width: user.width(),
            height: user.height(),
        });
    }

    let mut tally = PixelTally {
        target: 0,
        matching: 0,
        wrong: 0,
    };
    for (&r, &u) in reference.alpha().iter().zip(user.alpha()) {
        let is_target = r > threshold;
        let is_user = u > threshold;
        if is_target {
            tally.target += 1;
            if is_user {
                tally.matching += 1;
            }
        } else if is_user {
            tally.wrong += 1;
        }
    }
    Ok(tally)
}

/// Outcome of grading one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyResult {
    /// Raw score clamped at zero.
    pub accuracy: f64,
    /// Unclamped score; negative when stray ink outweighs coverage.
    pub raw_score: f64,
    pub passed: bool,
    pub tally: PixelTally,
}

/// Thresholds and penalty used to turn a tally into a verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    pub pass_threshold: f64,
    pub wrong_ink_penalty: f64,
    pub ink_alpha_threshold: u8,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}

impl ScoringRules {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            pass_threshold: settings.pass_threshold,
            wrong_ink_penalty: settings.wrong_ink_penalty,
            ink_alpha_threshold: settings.ink_alpha_threshold,
        }
    }

    /// `matching/target - penalty * wrong/target`; `None` for an empty reference.
    pub fn raw_score(&self, tally: &PixelTally) -> Option<f64> {
        if tally.target == 0 {
            return None;
        }
        let target = tally.target as f64;
        Some((tally.matching as f64 / target) - (tally.wrong as f64 / target * self.wrong_ink_penalty))
    }

    pub fn passes(&self, raw_score: f64) -> bool {
        raw_score >= self.pass_threshold
    }

    /// Compare rasters and produce the verdict for `glyph`.
    pub fn evaluate(&self, glyph: &str, reference: &AlphaRaster, user: &AlphaRaster) -> Result<AccuracyResult> {
        let tally = tally_pixels(reference, user, self.ink_alpha_threshold)?;
        let raw_score = self
            .raw_score(&tally)
            .ok_or_else(|| EngineError::DegenerateReference {
                glyph: glyph.to_string(),
            })?;

        Ok(AccuracyResult {
            accuracy: raw_score.max(0.0),
            raw_score,
            passed: self.passes(raw_score),
            tally,
        })
    }
}

/// Scores user rasters against glyphs rendered at a fixed surface size.
pub struct TraceScorer<R> {
    renderer: R,
    rules: ScoringRules,
    width: u32,
    height: u32,
    font_px: u32,
}

impl<R: GlyphRenderer> TraceScorer<R> {
    pub fn new(renderer: R, settings: &EngineSettings) -> Self {
        Self {
            renderer,
            rules: ScoringRules::from_settings(settings),
            width: settings.surface_width,
            height: settings.surface_height,
            font_px: settings.glyph_font_px,
        }
    }

    /// Width and height of the drawing surface.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn render_reference(&self, glyph: &str) -> Result<AlphaRaster> {
        let raster = self
            .renderer
            .render(glyph, self.width, self.height, self.font_px)?;
        if raster.width() != self.width || raster.height() != self.height {
            return Err(EngineError::RasterMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width: raster.width(),
                height: raster.height(),
            });
        }
        Ok(raster)
    }

    /// Grade `user` against the rendered `glyph`.
    pub fn score(&self, glyph: &str, user: &AlphaRaster) -> Result<AccuracyResult> {
        let reference = self.render_reference(glyph)?;
        let result = self.rules.evaluate(glyph, &reference, user)?;
        tracing::debug!(
            glyph,
            accuracy = result.accuracy,
            passed = result.passed,
            target = result.tally.target,
            matching = result.tally.matching,
            wrong = result.tally.wrong,
            "trace attempt scored"
        );
        Ok(result)
    }
}

/// Renders every glyph as the same filled rectangle; an empty glyph renders nothing.
#[cfg(test)]
pub(crate) struct RectRenderer {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

#[cfg(test)]
impl GlyphRenderer for RectRenderer {
    fn render(&self, glyph: &str, width: u32, height: u32, _font_px: u32) -> Result<AlphaRaster> {
        let mut raster = AlphaRaster::blank(width, height);
        if !glyph.is_empty() {
            for y in self.y0..self.y1 {
                for x in self.x0..self.x1 {
                    raster.set(x, y, 255);
                }
            }
        }
        Ok(raster)
    }
}
