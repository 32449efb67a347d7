//! Character tracing: rasterization, pixel scoring and the practice session.

pub mod practice;
pub mod raster;
pub mod scorer;

pub use practice::{PracticeEvent, TraceAction, TracePractice};
pub use raster::{AlphaRaster, Point};
pub use scorer::{tally_pixels, AccuracyResult, GlyphRenderer, PixelTally, ScoringRules, TraceScorer};
