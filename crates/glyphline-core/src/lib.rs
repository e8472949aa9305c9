//! glyphline core: the contracts between five stages and a file
//!
//! Text enters as characters and leaves as a PNG. Every stage in between
//! is delegated to a backend crate; this crate holds what they agree on.
//!
//! ## The Pipeline
//!
//! 1. **Font Resolver** - A family name or path becomes a font file
//! 2. **Font Loader** - The file becomes a sized, optionally varied face
//! 3. **Bidi Normalizer** - Logical text becomes visual runs
//! 4. **Shaper** - Characters become positioned glyphs
//! 5. **Rasterizer** - Glyphs become pixels
//! 6. **Export** - Pixels become PNG bytes on disk
//!
//! ## Build Your First Pipeline
//!
//! ```rust,no_run
//! use glyphline_core::{Pipeline, RenderParams};
//! use glyphline_core::types::TextRun;
//! use std::sync::Arc;
//!
//! # use glyphline_core::traits::*;
//! # use glyphline_core::types::*;
//! # struct MyShaper;
//! # impl Shaper for MyShaper {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn shape(&self, _: &TextRun, _: &dyn FontRef)
//! #         -> glyphline_core::Result<ShapingResult> { unimplemented!() }
//! # }
//! # struct MyRenderer;
//! # impl Renderer for MyRenderer {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn render(&self, _: &ShapingResult, _: &dyn FontRef, _: &RenderParams)
//! #         -> glyphline_core::Result<BitmapData> { unimplemented!() }
//! # }
//! # struct MyExporter;
//! # impl Exporter for MyExporter {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn export(&self, _: &BitmapData) -> glyphline_core::Result<Vec<u8>> { unimplemented!() }
//! # }
//! # fn load_font() -> Arc<dyn FontRef> { unimplemented!() }
//!
//! let pipeline = Pipeline::builder()
//!     .shaper(Arc::new(MyShaper))
//!     .renderer(Arc::new(MyRenderer))
//!     .exporter(Arc::new(MyExporter))
//!     .build()?;
//!
//! let font = load_font();
//! let png = pipeline.process(&TextRun::new("Hello, World!"), font, &RenderParams::default())?;
//! # Ok::<(), glyphline_core::GlyphlineError>(())
//! ```
//!
//! ## The Traits
//!
//! - [`Stage`] - One step over a caller-owned [`PipelineContext`]
//! - [`Shaper`] - Where characters become glyphs
//! - [`Renderer`] - Where glyphs become pixels
//! - [`Exporter`] - Where pixels become bytes
//! - [`traits::FontRef`] - Your window into a loaded, sized face

pub mod context;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use context::PipelineContext;
pub use error::{GlyphlineError, Result};
pub use pipeline::{ExportStage, Pipeline, PipelineBuilder, RenderingStage, ShapingStage};
pub use traits::{Exporter, Renderer, Shaper, Stage};

/// The data structures that travel between stages
pub mod types {
    use crate::error::BidiError;
    use std::path::PathBuf;

    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// Which way the text flows
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Direction {
        LeftToRight,
        RightToLeft,
        TopToBottom,
        BottomToTop,
    }

    impl Direction {
        pub fn is_horizontal(self) -> bool {
            matches!(self, Direction::LeftToRight | Direction::RightToLeft)
        }

        pub fn is_vertical(self) -> bool {
            !self.is_horizontal()
        }
    }

    /// Paragraph direction requested from the bidi normalizer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum BaseDirection {
        /// Pick from the text: RTL only when every strong character is RTL
        #[default]
        Auto,
        LeftToRight,
        RightToLeft,
    }

    impl BaseDirection {
        /// Horizontal directions map one-to-one; vertical ones have no bidi meaning
        pub fn from_direction(direction: Direction) -> Result<Self, BidiError> {
            match direction {
                Direction::LeftToRight => Ok(BaseDirection::LeftToRight),
                Direction::RightToLeft => Ok(BaseDirection::RightToLeft),
                other => Err(BidiError::UnsupportedDirection(other)),
            }
        }
    }

    /// Text plus everything the shaper may be told about it
    ///
    /// `None` fields are detected from the text itself.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TextRun {
        pub text: String,
        pub direction: Option<Direction>,
        /// ISO 15924 tag, e.g. `Latn`, `Arab`
        pub script: Option<String>,
        /// BCP 47 tag, e.g. `en`, `ar`
        pub language: Option<String>,
        /// OpenType feature settings like `("liga", 0)` or `("ss01", 1)`
        pub features: Vec<(String, u32)>,
    }

    impl TextRun {
        pub fn new(text: impl Into<String>) -> Self {
            Self {
                text: text.into(),
                ..Default::default()
            }
        }

        pub fn with_direction(mut self, direction: Direction) -> Self {
            self.direction = Some(direction);
            self
        }

        /// Same overrides, different text
        pub fn with_text(&self, text: impl Into<String>) -> Self {
            Self {
                text: text.into(),
                ..self.clone()
            }
        }
    }

    /// One directional run of a paragraph, reported in visual order
    #[derive(Debug, Clone, PartialEq)]
    pub struct BidiRun {
        /// The run's characters in logical (storage) order
        pub text: String,
        /// Byte range of the run inside the logical input
        pub range: (usize, usize),
        pub direction: Direction,
    }

    /// Logical text after bidi resolution
    #[derive(Debug, Clone, PartialEq)]
    pub struct BidiText {
        pub logical: String,
        /// Characters in left-to-right display order
        pub visual: String,
        pub base_direction: Direction,
        pub runs: Vec<BidiRun>,
    }

    impl BidiText {
        /// Whether any run needs right-to-left treatment
        pub fn is_mixed(&self) -> bool {
            self.runs
                .iter()
                .any(|run| run.direction != self.base_direction)
        }
    }

    /// One shaping result
    ///
    /// Advances and offsets are in pixels at the font's size; the shaper's
    /// font-unit scale is already divided out.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ShapedGlyph {
        pub id: GlyphId,
        /// UTF-8 byte offset of the source cluster
        pub cluster: u32,
        pub x_advance: f32,
        pub y_advance: f32,
        pub x_offset: f32,
        pub y_offset: f32,
    }

    /// What emerges after shaping: glyphs in display order
    #[derive(Debug, Clone, PartialEq)]
    pub struct ShapingResult {
        pub glyphs: Vec<ShapedGlyph>,
        pub direction: Direction,
        /// Pixels per em the advances were scaled to
        pub size: f32,
    }

    impl ShapingResult {
        pub fn empty(direction: Direction, size: f32) -> Self {
            Self {
                glyphs: Vec::new(),
                direction,
                size,
            }
        }

        /// Summed (x, y) advance of every glyph
        pub fn total_advance(&self) -> (f32, f32) {
            self.glyphs.iter().fold((0.0, 0.0), |(x, y), glyph| {
                (x + glyph.x_advance, y + glyph.y_advance)
            })
        }

        /// Append another result, shifting its clusters by `cluster_offset`
        pub fn append(&mut self, other: ShapingResult, cluster_offset: u32) {
            self.glyphs
                .extend(other.glyphs.into_iter().map(|glyph| ShapedGlyph {
                    cluster: glyph.cluster + cluster_offset,
                    ..glyph
                }));
        }
    }

    /// Vertical font metrics in pixels at the loaded size
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct FontMetrics {
        /// Distance above the baseline (positive)
        pub ascent: f32,
        /// Distance below the baseline (negative)
        pub descent: f32,
        pub line_gap: f32,
    }

    impl FontMetrics {
        pub fn line_height(&self) -> f32 {
            self.ascent - self.descent + self.line_gap
        }
    }

    /// Where the resolver found a font
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ResolvedFont {
        pub path: PathBuf,
        /// Face inside a collection (0 for single-face files)
        pub face_index: u32,
        /// Family name the match came from, when resolved by name
        pub family: Option<String>,
        /// A generic family was mapped to a concrete one
        pub substituted: bool,
    }

    impl ResolvedFont {
        pub fn from_path(path: impl Into<PathBuf>) -> Self {
            Self {
                path: path.into(),
                face_index: 0,
                family: None,
                substituted: false,
            }
        }
    }

    /// A requested design-axis value, keyed by axis name or tag
    #[derive(Debug, Clone, PartialEq)]
    pub struct AxisRequest {
        /// Axis display name (`Weight`) or tag (`wght`), matched case-sensitively
        pub name: String,
        pub value: f32,
    }

    impl AxisRequest {
        pub fn new(name: impl Into<String>, value: f32) -> Self {
            Self {
                name: name.into(),
                value,
            }
        }
    }

    /// Raw pixel data from rasterized glyphs
    #[derive(Debug, Clone, PartialEq)]
    pub struct BitmapData {
        pub width: u32,
        pub height: u32,
        pub format: BitmapFormat,
        pub data: Vec<u8>,
    }

    /// How pixels are arranged in the bitmap
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BitmapFormat {
        /// Straight (non-premultiplied) RGBA
        Rgba8,
    }

    impl BitmapFormat {
        pub fn bytes_per_pixel(self) -> usize {
            match self {
                BitmapFormat::Rgba8 => 4,
            }
        }
    }
}

/// How big the font should be
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSpec {
    /// Typographic points at a device resolution
    Points { points: f32, dpi: f32 },
    /// Pixels per em
    Pixels(f32),
}

impl SizeSpec {
    pub const POINTS_PER_INCH: f32 = 72.0;

    /// Check that every component is finite and strictly positive
    pub fn validate(&self) -> std::result::Result<(), error::InvalidSizeError> {
        use error::InvalidSizeError;

        let positive = |v: f32| v.is_finite() && v > 0.0;
        match *self {
            SizeSpec::Points { points, .. } if !positive(points) => {
                Err(InvalidSizeError::Points(points))
            },
            SizeSpec::Points { dpi, .. } if !positive(dpi) => Err(InvalidSizeError::Dpi(dpi)),
            SizeSpec::Pixels(px) if !positive(px) => Err(InvalidSizeError::Pixels(px)),
            _ => Ok(()),
        }
    }

    /// Pixels per em this size asks for
    pub fn pixels_per_em(&self) -> std::result::Result<f32, error::InvalidSizeError> {
        self.validate()?;
        Ok(match *self {
            SizeSpec::Points { points, dpi } => points * dpi / Self::POINTS_PER_INCH,
            SizeSpec::Pixels(px) => px,
        })
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        SizeSpec::Pixels(72.0)
    }
}

/// How rendering should look
#[derive(Debug, Clone)]
pub struct RenderParams {
    pub foreground: Color,
    /// Painted over the whole canvas before any glyph
    pub background: Color,
    /// Blank border on every side; `None` uses half the pixel size
    pub margin: Option<f32>,
    pub antialias: bool,
}

impl RenderParams {
    /// Margin in pixels for a face of `pixels_per_em`
    pub fn margin_for(&self, pixels_per_em: f32) -> f32 {
        self.margin.unwrap_or(pixels_per_em * 0.5).max(0.0)
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            foreground: Color::black(),
            background: Color::white(),
            margin: None,
            antialias: true,
        }
    }
}

/// Simple RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}
