//! The contracts that bind every backend together
//!
//! - [`Stage`] - One step over the caller's [`PipelineContext`]
//! - [`FontRef`] - A loaded face at a fixed size and variation
//! - [`Shaper`] - Where characters become glyphs
//! - [`Renderer`] - Where glyphs become pixels
//! - [`Exporter`] - Where pixels become bytes

use crate::{error::Result, types::*, PipelineContext, RenderParams};

/// One step of the pipeline
///
/// A stage reads what earlier stages left in the context and stores its
/// own result there. The context stays owned by the caller throughout.
///
/// ```ignore
/// struct MyStage;
///
/// impl Stage for MyStage {
///     fn name(&self) -> &'static str {
///         "my-stage"
///     }
///
///     fn process(&self, context: &mut PipelineContext) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Stage: Send + Sync {
    /// Used for debugging and logging
    fn name(&self) -> &'static str;

    /// Do your work against the context
    fn process(&self, context: &mut PipelineContext) -> Result<()>;
}

/// A face that has been loaded and sized
///
/// Implementations are immutable once built: the size and the variation
/// coordinates are fixed at load time.
pub trait FontRef: Send + Sync {
    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    /// Face inside a collection file
    fn face_index(&self) -> u32 {
        0
    }

    /// The font's design grid
    fn units_per_em(&self) -> u16;

    /// Size every stage should render at
    fn pixels_per_em(&self) -> f32;

    /// Applied axis values as `(tag, user value)` pairs, e.g. `("wght", 700.0)`
    fn variations(&self) -> &[(String, f32)] {
        &[]
    }

    /// Vertical metrics at this size and variation
    fn metrics(&self) -> FontMetrics;

    /// Find the glyph that represents this character
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;
}

/// Where characters learn their positions
pub trait Shaper: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Transform characters into positioned glyphs, in display order
    fn shape(&self, run: &TextRun, font: &dyn FontRef) -> Result<ShapingResult>;
}

/// Where glyphs become visible
pub trait Renderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Paint every glyph onto a canvas sized to fit them
    fn render(
        &self,
        shaped: &ShapingResult,
        font: &dyn FontRef,
        params: &RenderParams,
    ) -> Result<BitmapData>;
}

/// The final step: pixels become files
pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Encode the bitmap as bytes
    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>>;
}
