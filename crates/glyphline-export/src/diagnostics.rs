//! Per-glyph dump of a shaping result
//!
//! One entry per glyph, in display order, with the pen position the
//! rasterizer will paint it at. Meant for eyes and for diffing; the
//! layout of the text form may change between releases.

use std::fmt;

use serde::{Deserialize, Serialize};

use glyphline_core::{
    error::{RasterizationError, Result},
    layout::glyph_placements,
    types::{Direction, ShapingResult},
};

/// One glyph of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphReportEntry {
    #[serde(rename = "g")]
    pub glyph_id: u32,
    #[serde(rename = "cl")]
    pub cluster: u32,
    #[serde(rename = "ax")]
    pub x_advance: f32,
    #[serde(rename = "ay")]
    pub y_advance: f32,
    #[serde(rename = "dx")]
    pub x_offset: f32,
    #[serde(rename = "dy")]
    pub y_offset: f32,
    /// Paint origin relative to the line origin, y down
    pub x: f32,
    pub y: f32,
}

/// Everything shaping decided, flattened for printing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphReport {
    pub direction: String,
    pub size: f32,
    pub glyphs: Vec<GlyphReportEntry>,
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::LeftToRight => "ltr",
        Direction::RightToLeft => "rtl",
        Direction::TopToBottom => "ttb",
        Direction::BottomToTop => "btt",
    }
}

impl GlyphReport {
    pub fn new(shaped: &ShapingResult) -> Self {
        let glyphs = shaped
            .glyphs
            .iter()
            .zip(glyph_placements(shaped))
            .map(|(glyph, placement)| GlyphReportEntry {
                glyph_id: glyph.id,
                cluster: glyph.cluster,
                x_advance: glyph.x_advance,
                y_advance: glyph.y_advance,
                x_offset: glyph.x_offset,
                y_offset: glyph.y_offset,
                x: placement.x,
                y: placement.y,
            })
            .collect();

        Self {
            direction: direction_name(shaped.direction).to_string(),
            size: shaped.size,
            glyphs,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| RasterizationError::EncodeFailed(e.to_string()).into())
    }
}

impl fmt::Display for GlyphReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} glyphs, {}, {:.2} px/em",
            self.glyphs.len(),
            self.direction,
            self.size
        )?;
        for (i, g) in self.glyphs.iter().enumerate() {
            writeln!(
                f,
                "{:>4}: gid={:<5} cluster={:<4} adv=({:.2}, {:.2}) off=({:.2}, {:.2}) pos=({:.2}, {:.2})",
                i, g.glyph_id, g.cluster, g.x_advance, g.y_advance, g.x_offset, g.y_offset, g.x, g.y
            )?;
        }
        Ok(())
    }
}
