//! Integration tests for the Skia rasterizer
//!
//! Stub-font and variable-fixture tests run everywhere; other real-font
//! tests look for a font through `GLYPHLINE_TEST_FONT`, `test-fonts/`, or
//! the system sans-serif.

use std::path::PathBuf;

use glyphline_core::{
    error::RasterizationError,
    layout::CanvasLayout,
    traits::{FontRef, Renderer, Shaper},
    types::{
        AxisRequest, BitmapData, BitmapFormat, Direction, FontMetrics, GlyphId, ResolvedFont,
        ShapedGlyph, ShapingResult, TextRun,
    },
    Color, GlyphlineError, RenderParams, SizeSpec,
};
use glyphline_fontdb::{FontHandle, FontLoader, FontResolver};
use glyphline_render_skia::SkiaRasterizer;
use glyphline_shape_hr::HarfrustShaper;

/// Stub font for testing
struct StubFont {
    data: Vec<u8>,
}

impl FontRef for StubFont {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn units_per_em(&self) -> u16 {
        1000
    }

    fn pixels_per_em(&self) -> f32 {
        16.0
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: 12.0,
            descent: -4.0,
            line_gap: 0.0,
        }
    }

    fn glyph_id(&self, _ch: char) -> Option<GlyphId> {
        Some(0)
    }
}

fn empty_line() -> ShapingResult {
    ShapingResult::empty(Direction::LeftToRight, 16.0)
}

fn one_glyph(x_advance: f32) -> ShapingResult {
    ShapingResult {
        glyphs: vec![ShapedGlyph {
            id: 1,
            cluster: 0,
            x_advance,
            y_advance: 0.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }],
        direction: Direction::LeftToRight,
        size: 16.0,
    }
}

fn pixels(bitmap: &BitmapData) -> impl Iterator<Item = &[u8]> {
    bitmap.data.chunks_exact(4)
}

#[test]
fn test_renderer_creation() {
    let renderer = SkiaRasterizer::new();
    assert_eq!(renderer.name(), "skia");
}

#[test]
fn test_empty_rendering() {
    let renderer = SkiaRasterizer::new();
    let font = StubFont { data: vec![] };

    // Should succeed with empty glyph list
    let bitmap = match renderer.render(&empty_line(), &font, &RenderParams::default()) {
        Ok(bitmap) => bitmap,
        Err(e) => unreachable!("empty line must render: {e}"),
    };

    // Margin 8 on each side, one em of height
    assert_eq!(bitmap.format, BitmapFormat::Rgba8);
    assert_eq!((bitmap.width, bitmap.height), (16, 32));
    assert_eq!(bitmap.data.len(), 16 * 32 * 4);
    assert!(pixels(&bitmap).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn test_custom_background() {
    let font = StubFont { data: vec![] };
    let params = RenderParams {
        background: Color::rgba(255, 0, 0, 255),
        margin: Some(2.0),
        ..RenderParams::default()
    };

    let bitmap = match SkiaRasterizer::new().render(&empty_line(), &font, &params) {
        Ok(bitmap) => bitmap,
        Err(e) => unreachable!("empty line must render: {e}"),
    };
    assert_eq!((bitmap.width, bitmap.height), (4, 20));
    assert!(pixels(&bitmap).all(|px| px == [255, 0, 0, 255]));
}

#[test]
fn test_translucent_background_comes_back_straight() {
    let font = StubFont { data: vec![] };
    let params = RenderParams {
        background: Color::rgba(200, 100, 50, 128),
        ..RenderParams::default()
    };

    let bitmap = match SkiaRasterizer::new().render(&empty_line(), &font, &params) {
        Ok(bitmap) => bitmap,
        Err(e) => unreachable!("empty line must render: {e}"),
    };
    for px in pixels(&bitmap) {
        assert_eq!(px[3], 128);
        assert!(px[0].abs_diff(200) <= 2);
        assert!(px[1].abs_diff(100) <= 2);
        assert!(px[2].abs_diff(50) <= 2);
    }
}

#[test]
fn test_oversized_canvas_is_rejected() {
    let font = StubFont { data: vec![] };
    let result = SkiaRasterizer::new().render(&one_glyph(70_000.0), &font, &RenderParams::default());

    assert!(matches!(
        result,
        Err(GlyphlineError::Rasterization(
            RasterizationError::InvalidDimensions { .. }
        ))
    ));
}

#[test]
fn test_custom_max_size() {
    let font = StubFont { data: vec![] };
    let renderer = SkiaRasterizer::new().with_max_size(20);
    let result = renderer.render(&one_glyph(100.0), &font, &RenderParams::default());

    assert!(matches!(
        result,
        Err(GlyphlineError::Rasterization(
            RasterizationError::InvalidDimensions { width: 116, .. }
        ))
    ));
}

/// Stub font at an arbitrary pixel size
struct LargeStubFont {
    ppem: f32,
}

impl FontRef for LargeStubFont {
    fn data(&self) -> &[u8] {
        &[]
    }

    fn units_per_em(&self) -> u16 {
        1000
    }

    fn pixels_per_em(&self) -> f32 {
        self.ppem
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: self.ppem * 0.75,
            descent: -self.ppem * 0.25,
            line_gap: 0.0,
        }
    }

    fn glyph_id(&self, _ch: char) -> Option<GlyphId> {
        Some(0)
    }
}

#[test]
fn test_huge_pixel_size_fails_before_allocating() {
    // 30000x60000 passes the per-side limit but needs about 7 GB
    let font = LargeStubFont { ppem: 30_000.0 };
    let line = ShapingResult::empty(Direction::LeftToRight, 30_000.0);
    let result = SkiaRasterizer::new().render(&line, &font, &RenderParams::default());

    assert!(matches!(
        result,
        Err(GlyphlineError::Rasterization(
            RasterizationError::AllocationFailed {
                width: 30_000,
                height: 60_000
            }
        ))
    ));
}

#[test]
fn test_custom_max_bytes() {
    let font = StubFont { data: vec![] };
    // The empty line canvas is 16x32, 2048 bytes
    let tight = SkiaRasterizer::new().with_max_bytes(2047);
    assert!(matches!(
        tight.render(&empty_line(), &font, &RenderParams::default()),
        Err(GlyphlineError::Rasterization(
            RasterizationError::AllocationFailed { .. }
        ))
    ));

    let exact = SkiaRasterizer::new().with_max_bytes(2048);
    assert!(exact.render(&empty_line(), &font, &RenderParams::default()).is_ok());
}

#[test]
fn test_zero_sized_canvas_is_rejected() {
    let font = StubFont { data: vec![] };
    let params = RenderParams {
        margin: Some(0.0),
        ..RenderParams::default()
    };
    let result = SkiaRasterizer::new().render(&empty_line(), &font, &params);

    assert!(matches!(
        result,
        Err(GlyphlineError::Rasterization(
            RasterizationError::InvalidDimensions { width: 0, .. }
        ))
    ));
}

#[test]
fn test_garbage_font_with_glyphs_is_an_error() {
    let font = StubFont {
        data: vec![0x42; 128],
    };
    let result = SkiaRasterizer::new().render(&one_glyph(10.0), &font, &RenderParams::default());

    assert!(matches!(
        result,
        Err(GlyphlineError::Rasterization(RasterizationError::InvalidFont(_)))
    ));
}

fn test_font() -> Option<ResolvedFont> {
    if let Some(path) = std::env::var_os("GLYPHLINE_TEST_FONT").map(PathBuf::from) {
        if path.is_file() {
            return Some(ResolvedFont::from_path(path));
        }
    }
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fonts");
    if let Ok(entries) = std::fs::read_dir(dir) {
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "ttf" || ext == "otf"))
            .collect();
        paths.sort();
        if let Some(path) = paths.into_iter().next() {
            return Some(ResolvedFont::from_path(path));
        }
    }
    FontResolver::system().resolve("sans-serif").ok()
}

fn load(axes: &[AxisRequest]) -> Option<FontHandle> {
    let font = test_font()?;
    match FontLoader::new().load_resolved(&font, SizeSpec::Pixels(48.0), axes) {
        Ok(handle) => Some(handle),
        Err(e) => unreachable!("test font failed to load: {e}"),
    }
}

fn render(text: &str, font: &FontHandle) -> (ShapingResult, BitmapData) {
    let shaped = match HarfrustShaper::new().shape(&TextRun::new(text), font) {
        Ok(shaped) => shaped,
        Err(e) => unreachable!("shaping failed: {e}"),
    };
    match SkiaRasterizer::new().render(&shaped, font, &RenderParams::default()) {
        Ok(bitmap) => (shaped, bitmap),
        Err(e) => unreachable!("rendering failed: {e}"),
    }
}

/// Pixels noticeably darker than the white background
fn ink(bitmap: &BitmapData) -> usize {
    pixels(bitmap).filter(|px| px[0] < 128).count()
}

#[test]
fn test_hello_leaves_ink() {
    let Some(font) = load(&[]) else {
        return;
    };
    let (_, bitmap) = render("Hello", &font);
    assert!(ink(&bitmap) > 0, "no glyph reached the canvas");
}

#[test]
fn test_canvas_matches_layout() {
    let Some(font) = load(&[]) else {
        return;
    };
    let (shaped, bitmap) = render("Hello, Text!", &font);
    let layout = CanvasLayout::compute(&shaped, &font.metrics(), 24.0);

    assert_eq!((bitmap.width, bitmap.height), (layout.width, layout.height));
}

#[test]
fn test_margin_stays_blank() {
    let Some(font) = load(&[]) else {
        return;
    };
    let (_, bitmap) = render("Hello", &font);
    let width = bitmap.width as usize;

    // The first two rows sit well inside the 24 px margin
    let top = &bitmap.data[..width * 2 * 4];
    assert!(top.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn test_space_renders_nothing() {
    let Some(font) = load(&[]) else {
        return;
    };
    let (shaped, bitmap) = render("   ", &font);
    assert_eq!(shaped.glyphs.len(), 3);
    assert_eq!(ink(&bitmap), 0);
}

/// Three-axis fixture covering "Hello"; heavier weights thicken strokes
fn variable_font(axes: &[AxisRequest]) -> FontHandle {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fonts/variable/GlyphlineAxes-VF.ttf");
    match FontLoader::new().load(&path, 0, SizeSpec::Pixels(48.0), axes) {
        Ok(handle) => handle,
        Err(e) => unreachable!("variable fixture failed to load: {e}"),
    }
}

#[test]
fn test_heavier_weight_leaves_more_ink() {
    let light = variable_font(&[AxisRequest::new("Weight", 100.0)]);
    let regular = variable_font(&[]);
    let heavy = variable_font(&[AxisRequest::new("Weight", 900.0)]);

    let (_, thin) = render("Hello", &light);
    let (_, normal) = render("Hello", &regular);
    let (_, bold) = render("Hello", &heavy);
    assert!(ink(&thin) < ink(&normal), "{} !< {}", ink(&thin), ink(&normal));
    assert!(ink(&normal) < ink(&bold), "{} !< {}", ink(&normal), ink(&bold));
}

#[test]
fn test_narrower_width_leaves_less_ink() {
    let regular = variable_font(&[AxisRequest::new("Weight", 700.0), AxisRequest::new("Width", 100.0)]);
    let narrow = variable_font(&[AxisRequest::new("Weight", 700.0), AxisRequest::new("Width", 75.0)]);

    let (_, wide) = render("Hello", &regular);
    let (_, squeezed) = render("Hello", &narrow);
    assert!(ink(&squeezed) < ink(&wide), "{} !< {}", ink(&squeezed), ink(&wide));
}
