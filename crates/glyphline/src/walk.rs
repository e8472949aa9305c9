//! Character walk: glyph boxes without shaping
//!
//! Each character goes straight through the cmap. No kerning, no
//! ligatures, no reordering; the pen moves by whole-pixel advances.
//! Handy for checking what a font and size do to single glyphs.

use glyphline_core::{traits::FontRef, types::GlyphId};
use glyphline_fontdb::FontHandle;

/// Pen start used when the caller has no preference
pub const DEFAULT_WALK_ORIGIN: (i32, i32) = (300, 200);

/// Where one character's bitmap would land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharPlacement {
    pub ch: char,
    /// 0 when the font has no glyph for `ch`
    pub glyph_id: GlyphId,
    /// Top-left corner of the glyph bitmap, y down
    pub x: i32,
    pub y: i32,
}

/// Walk `text` one character at a time from `origin`
///
/// A glyph's box starts at `pen.x + left bearing` and `pen.y - top
/// bearing`, with the bearings rounded outward to whole pixels.
pub fn walk_chars(text: &str, font: &FontHandle, origin: (i32, i32)) -> Vec<CharPlacement> {
    let (mut pen_x, pen_y) = origin;

    text.chars()
        .map(|ch| {
            let glyph_id = font.glyph_id(ch).unwrap_or(0);
            let metrics = font.glyph_metrics(glyph_id).unwrap_or_default();

            let left = metrics.x_min.floor() as i32;
            let top = metrics.y_max.ceil() as i32;
            let placement = CharPlacement {
                ch,
                glyph_id,
                x: pen_x + left,
                y: pen_y - top,
            };

            pen_x += metrics.advance_width.round() as i32;
            placement
        })
        .collect()
}
