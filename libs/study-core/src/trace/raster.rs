//! Alpha rasters and stroke rasterization.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// A point on the drawing surface, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Row-major grid of per-pixel alpha values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaRaster {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaRaster {
    /// Fully transparent raster.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width as usize * height as usize],
        }
    }

    /// Wrap an alpha buffer of exactly `width * height` bytes.
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(EngineError::RasterLength {
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// Extract the alpha channel from interleaved RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(EngineError::RasterLength {
                expected,
                actual: rgba.len(),
            });
        }
        let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.alpha[self.index(x, y)])
    }

    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.alpha[idx] = value;
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn same_size(&self, other: &AlphaRaster) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Number of pixels whose alpha exceeds `threshold`.
    pub fn ink_count(&self, threshold: u8) -> usize {
        self.alpha.iter().filter(|&&a| a > threshold).count()
    }

    /// Paint an opaque polyline with round caps and joins.
    ///
    /// A pixel is inked when its center lies within `width / 2` of any segment.
    /// A single point paints a dot.
    pub fn paint_stroke(&mut self, points: &[Point], width: f32) {
        let radius = width / 2.0;
        match points {
            [] => {}
            [only] => self.paint_segment(*only, *only, radius),
            _ => {
                for pair in points.windows(2) {
                    self.paint_segment(pair[0], pair[1], radius);
                }
            }
        }
    }

    fn paint_segment(&mut self, a: Point, b: Point, radius: f32) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let x0 = (a.x.min(b.x) - radius).floor().clamp(0.0, max_x) as u32;
        let x1 = (a.x.max(b.x) + radius).ceil().clamp(0.0, max_x) as u32;
        let y0 = (a.y.min(b.y) - radius).floor().clamp(0.0, max_y) as u32;
        let y1 = (a.y.max(b.y) + radius).ceil().clamp(0.0, max_y) as u32;

        let radius_sq = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_sq_to_segment(center, a, b) <= radius_sq {
                    self.set(x, y, u8::MAX);
                }
            }
        }
    }
}

fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let cx = a.x + t * dx;
    let cy = a.y + t * dy;
    (p.x - cx) * (p.x - cx) + (p.y - cy) * (p.y - cy)
}
