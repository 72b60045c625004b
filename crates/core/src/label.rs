use serde::Serialize;
use unicode_width::UnicodeWidthChar;

/// Average glyph advance as a fraction of the font size.
pub const CHAR_WIDTH_EM: f64 = 0.6;

const ELLIPSIS: char = '…';

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FittedLabel {
    pub text: String,
    pub font_size: f64,
}

impl FittedLabel {
    /// Estimated rendered width in pixels.
    pub fn approx_width(&self) -> f64 {
        columns(&self.text) as f64 * self.font_size * CHAR_WIDTH_EM
    }
}

/// Display columns of `text`, measured per character. Control characters
/// count as zero.
fn columns(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

/// Picks a font size and, if needed, an ellipsized label that fits a tile.
///
/// Font size is `min(max_font, tile_w / 8, tile_h / 2)`. Text width is
/// estimated from display columns, not real glyph metrics.
pub fn fit_label(text: &str, tile_w: f64, tile_h: f64, max_font: f64) -> FittedLabel {
    let font_size = max_font.min(tile_w / 8.0).min(tile_h / 2.0).max(0.0);
    if !(font_size > 0.0 && font_size.is_finite()) {
        return FittedLabel {
            text: String::new(),
            font_size: 0.0,
        };
    }

    let text: String = text.chars().filter(|ch| !ch.is_control()).collect();
    let text = text.trim();
    let budget = (tile_w / (font_size * CHAR_WIDTH_EM)).floor() as usize;
    if columns(text) <= budget {
        return FittedLabel {
            text: text.to_string(),
            font_size,
        };
    }

    let mut out = String::new();
    let mut used = 0;
    let room = budget.saturating_sub(ELLIPSIS.width().unwrap_or(1));
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > room {
            break;
        }
        used += w;
        out.push(ch);
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    if budget > 0 {
        out.push(ELLIPSIS);
    }
    FittedLabel {
        text: out,
        font_size,
    }
}
