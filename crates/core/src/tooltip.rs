use serde::Serialize;

use crate::human::human_value;

pub const FADE_IN_SECS: f32 = 0.2;
pub const FADE_OUT_SECS: f32 = 0.5;
pub const OPACITY: f32 = 0.9;

const OFFSET_X: f64 = 10.0;
const OFFSET_Y: f64 = -40.0;
const MIN_TOP: f64 = 10.0;

/// Hover metadata of one tile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TileMeta {
    pub name: String,
    pub category: String,
    pub value: f64,
}

impl TileMeta {
    pub fn lines(&self) -> [String; 3] {
        [
            self.name.trim().to_string(),
            format!("Category: {}", self.category),
            format!("Value: {}", human_value(self.value)),
        ]
    }

    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

/// Top-left corner of a tooltip box of `size` shown for a pointer at
/// `cursor`, kept inside a canvas of `canvas` size.
pub fn place(cursor: (f64, f64), size: (f64, f64), canvas: (f64, f64)) -> (f64, f64) {
    let (cx, cy) = cursor;
    let (w, h) = size;
    let (cw, ch) = canvas;
    let left = (cx + OFFSET_X).min(cw - w).max(0.0);
    let top = (cy + OFFSET_Y).max(MIN_TOP).min(ch - h).max(0.0);
    (left, top)
}
