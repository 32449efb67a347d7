//! Drawing fixtures for trace tests.

use nihongo_daily_lib::commands;
use nihongo_daily_lib::state::AppState;

pub const SURFACE: u32 = 320;

/// Alpha channel of a filled square standing in for a rendered glyph.
pub fn reference_square() -> Vec<u8> {
    let mut alpha = vec![0u8; (SURFACE * SURFACE) as usize];
    for y in 100..220 {
        for x in 100..220 {
            alpha[(y * SURFACE + x) as usize] = 255;
        }
    }
    alpha
}

/// Horizontal passes covering most of the reference square.
pub fn draw_cover(state: &AppState) {
    for row in 0..8 {
        let y = 107.0 + 14.0 * row as f32;
        commands::begin_stroke(state, 107.0, y).unwrap();
        commands::extend_stroke(state, 213.0, y).unwrap();
        commands::end_stroke(state).unwrap();
    }
}

/// A short scribble far from the reference square.
pub fn draw_scribble(state: &AppState) {
    commands::begin_stroke(state, 10.0, 10.0).unwrap();
    commands::extend_stroke(state, 60.0, 10.0).unwrap();
    commands::end_stroke(state).unwrap();
}
