//! Skia Rasterizer - glyph outlines to RGBA pixels via tiny-skia
//!
//! Outlines come from skrifa at the font's size and variation, pass
//! through kurbo, and are filled straight onto one canvas sized by
//! [`CanvasLayout`]. The canvas lives only for the duration of a call.
//!
//! ## Coordinates
//!
//! Outlines are y-up around their own origin. Each glyph is flipped and
//! moved to the canvas origin plus its pen position, which
//! [`glyph_placements`] has already expressed y-down.

use kurbo::{BezPath, PathEl};
use skrifa::{
    instance::{Location, Size},
    outline::DrawSettings,
    MetadataProvider,
};
use tiny_skia::{Color as SkiaColor, FillRule, Paint, PathBuilder, Pixmap, Transform};

use glyphline_core::{
    error::{RasterizationError, Result},
    layout::{glyph_placements, CanvasLayout},
    traits::{FontRef, Renderer},
    types::{BitmapData, BitmapFormat, ShapingResult},
    Color, RenderParams,
};

/// Largest canvas, in bytes, the rasterizer will try to allocate (256 MiB)
pub const MAX_CANVAS_BYTES: u64 = 256 * 1024 * 1024;

/// tiny-skia powered rasterizer
#[derive(Debug, Clone)]
pub struct SkiaRasterizer {
    /// Maximum canvas dimension to prevent memory exhaustion
    max_size: u32,
    /// Maximum RGBA buffer size; each side may pass `max_size` and still
    /// multiply out to more memory than is sane
    max_bytes: u64,
}

impl SkiaRasterizer {
    pub fn new() -> Self {
        Self {
            max_size: 65535,
            max_bytes: MAX_CANVAS_BYTES,
        }
    }

    /// Refuse canvases wider or taller than this
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Refuse canvases whose pixels need more than this many bytes
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Size the canvas and refuse anything degenerate or oversized
    fn layout(
        &self,
        shaped: &ShapingResult,
        font: &dyn FontRef,
        params: &RenderParams,
    ) -> Result<CanvasLayout> {
        let margin = params.margin_for(font.pixels_per_em());
        let layout = CanvasLayout::compute(shaped, &font.metrics(), margin);

        if layout.width == 0
            || layout.height == 0
            || layout.width > self.max_size
            || layout.height > self.max_size
        {
            return Err(RasterizationError::InvalidDimensions {
                width: layout.width,
                height: layout.height,
            }
            .into());
        }

        let bytes = u64::from(layout.width) * u64::from(layout.height) * 4;
        if bytes > self.max_bytes {
            log::warn!(
                "Skia: {}x{} canvas needs {} bytes, limit is {}",
                layout.width,
                layout.height,
                bytes,
                self.max_bytes
            );
            return Err(RasterizationError::AllocationFailed {
                width: layout.width,
                height: layout.height,
            }
            .into());
        }
        Ok(layout)
    }
}

impl Default for SkiaRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_skia(color: Color) -> SkiaColor {
    SkiaColor::from_rgba8(color.r, color.g, color.b, color.a)
}

/// Variation location from the font's applied `(tag, value)` pairs
fn build_location(font: &skrifa::FontRef<'_>, variations: &[(String, f32)]) -> Location {
    if variations.is_empty() {
        return Location::default();
    }
    font.axes().location(
        variations
            .iter()
            .map(|(tag, value)| (tag.as_str(), *value)),
    )
}

/// Trace one glyph into a y-up path in pixels; `None` for empty outlines
fn glyph_path(
    font: &skrifa::FontRef<'_>,
    glyph_id: u32,
    size: Size,
    location: &Location,
) -> Option<tiny_skia::Path> {
    let outlines = font.outline_glyphs();
    let Some(glyph) = outlines.get(skrifa::GlyphId::new(glyph_id)) else {
        log::debug!("Skia: glyph {} has no outline", glyph_id);
        return None;
    };

    let mut path = BezPath::new();
    let mut pen = PathPen { path: &mut path };
    let settings = DrawSettings::unhinted(size, location.coords());
    if let Err(e) = glyph.draw(settings, &mut pen) {
        log::warn!("Skia: cannot draw glyph {}: {:?}", glyph_id, e);
        return None;
    }

    // Translate kurbo's path format into tiny-skia's native format
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(ctrl, end) => {
                builder.quad_to(ctrl.x as f32, ctrl.y as f32, end.x as f32, end.y as f32)
            },
            PathEl::CurveTo(c1, c2, end) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                end.x as f32,
                end.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// Straight RGBA out of tiny-skia's premultiplied pixels
fn demultiply(mut data: Vec<u8>) -> Vec<u8> {
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        let a_u = u32::from(a);
        px[0] = ((u32::from(px[0]) * 255 + a_u / 2) / a_u).min(255) as u8;
        px[1] = ((u32::from(px[1]) * 255 + a_u / 2) / a_u).min(255) as u8;
        px[2] = ((u32::from(px[2]) * 255 + a_u / 2) / a_u).min(255) as u8;
    }
    data
}

impl Renderer for SkiaRasterizer {
    fn name(&self) -> &'static str {
        "skia"
    }

    fn render(
        &self,
        shaped: &ShapingResult,
        font: &dyn FontRef,
        params: &RenderParams,
    ) -> Result<BitmapData> {
        let layout = self.layout(shaped, font, params)?;

        let mut pixmap =
            Pixmap::new(layout.width, layout.height).ok_or(RasterizationError::AllocationFailed {
                width: layout.width,
                height: layout.height,
            })?;
        pixmap.fill(to_skia(params.background));

        if !shaped.glyphs.is_empty() {
            let font_ref = skrifa::FontRef::from_index(font.data(), font.face_index())
                .map_err(|e| RasterizationError::InvalidFont(e.to_string()))?;
            let location = build_location(&font_ref, font.variations());
            let size = Size::new(font.pixels_per_em());

            let mut paint = Paint::default();
            paint.set_color(to_skia(params.foreground));
            paint.anti_alias = params.antialias;

            let mut painted = 0usize;
            for placement in glyph_placements(shaped) {
                let Some(path) = glyph_path(&font_ref, placement.id, size, &location) else {
                    continue;
                };
                // Flip y, then move the glyph origin onto its pen position
                let transform = Transform::from_scale(1.0, -1.0).post_translate(
                    layout.origin_x + placement.x,
                    layout.origin_y + placement.y,
                );
                pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
                painted += 1;
            }

            log::debug!(
                "Skia: painted {}/{} glyphs on {}x{}",
                painted,
                shaped.glyphs.len(),
                layout.width,
                layout.height
            );
        }

        Ok(BitmapData {
            width: layout.width,
            height: layout.height,
            format: BitmapFormat::Rgba8,
            data: demultiply(pixmap.take()),
        })
    }
}

/// Bridge between skrifa's outline commands and kurbo's path format
struct PathPen<'a> {
    path: &'a mut BezPath,
}

impl skrifa::outline::OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((f64::from(x), f64::from(y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((f64::from(x), f64::from(y)));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((f64::from(cx0), f64::from(cy0)), (f64::from(x), f64::from(y)));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (f64::from(cx0), f64::from(cy0)),
            (f64::from(cx1), f64::from(cy1)),
            (f64::from(x), f64::from(y)),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
