//! Canvas geometry and pen arithmetic shared by every rasterizer
//!
//! Shaping output lives in a y-up coordinate system; pixels live in a
//! y-down one. Everything that converts between the two is here so a
//! renderer only has to paint.

use crate::types::{FontMetrics, GlyphId, ShapingResult};

/// A glyph's paint origin, relative to the baseline origin, in raster coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub id: GlyphId,
    pub cluster: u32,
    pub x: f32,
    pub y: f32,
}

/// Walk the glyphs with a running pen
///
/// The pen accumulates advances only. A glyph's offset moves that glyph
/// alone and never the pen. The y axis is negated on the way out.
pub fn glyph_placements(shaped: &ShapingResult) -> Vec<GlyphPlacement> {
    let mut current_x = 0.0_f32;
    let mut current_y = 0.0_f32;

    shaped
        .glyphs
        .iter()
        .map(|glyph| {
            let placement = GlyphPlacement {
                id: glyph.id,
                cluster: glyph.cluster,
                x: current_x + glyph.x_offset,
                y: -(current_y + glyph.y_offset),
            };
            current_x += glyph.x_advance;
            current_y += glyph.y_advance;
            placement
        })
        .collect()
}

/// Size of the surface and where the first glyph's origin sits on it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl CanvasLayout {
    /// Fit a canvas around a shaped line
    ///
    /// The writing axis gets the summed advances, both axes get the
    /// margin twice, and the cross axis gets one em of room. Horizontal
    /// text is centred vertically on its line box; vertical text is
    /// centred horizontally on its em.
    pub fn compute(shaped: &ShapingResult, metrics: &FontMetrics, margin: f32) -> Self {
        let (sum_x, sum_y) = shaped.total_advance();
        let size = shaped.size;

        // Advances may point either way along the writing axis
        let mut width = 2.0 * margin + sum_x.abs();
        let mut height = 2.0 * margin + sum_y.abs();

        // A pen that runs left or up starts on the far side of the canvas.
        // Shaping y grows upward, so only positive y sums move the origin.
        let shift_x = (-sum_x).max(0.0);
        let shift_y = sum_y.max(0.0);

        let (origin_x, origin_y) = if shaped.direction.is_horizontal() {
            height += size;
            let baseline = (size - metrics.line_height()) * 0.5 + metrics.ascent;
            (margin + shift_x, margin + baseline + shift_y)
        } else {
            width += size;
            (margin + size * 0.5 + shift_x, margin + shift_y)
        };

        Self {
            width: width.ceil().max(0.0) as u32,
            height: height.ceil().max(0.0) as u32,
            origin_x,
            origin_y,
        }
    }
}
