//! glyphline - text to PNG in five stages
//!
//! 1. Resolve a family name or path to a font file
//! 2. Load it at a size, pinning variable-font axes
//! 3. Reorder bidirectional text into visual runs
//! 4. Shape the runs into positioned glyphs
//! 5. Rasterize the glyphs and write a PNG
//!
//! # Example
//!
//! ```no_run
//! use glyphline::prelude::*;
//!
//! let options = PipelineOptions {
//!     font: "sans-serif".into(),
//!     size: SizeSpec::Pixels(72.0),
//!     ..PipelineOptions::default()
//! };
//! let context = glyphline::render_to_file("Hello, World!", &options, "out.png")?;
//! if let Some(bitmap) = context.bitmap() {
//!     println!("{}x{}", bitmap.width, bitmap.height);
//! }
//! # Ok::<(), GlyphlineError>(())
//! ```

pub mod options;
pub mod walk;

pub use glyphline_core::{
    error, layout, traits, types, Color, Pipeline, PipelineContext, RenderParams, SizeSpec,
};
pub use glyphline_export as export;
pub use glyphline_fontdb as fontdb;
pub use glyphline_render_skia as render_skia;
pub use glyphline_shape_hr as shape_hr;
pub use glyphline_unicode as unicode;

pub use options::{build_pipeline, render, render_to_file, PipelineOptions};
pub use walk::{walk_chars, CharPlacement, DEFAULT_WALK_ORIGIN};

/// Common imports for typical usage
pub mod prelude {
    pub use crate::options::{render, render_to_file, PipelineOptions};
    pub use glyphline_core::{
        error::{GlyphlineError, Result},
        traits::{Exporter, FontRef, Renderer, Shaper},
        types::{AxisRequest, BaseDirection, Direction, ShapingResult, TextRun},
        Color, Pipeline, PipelineContext, RenderParams, SizeSpec,
    };
    pub use glyphline_fontdb::{FontHandle, FontLoader, FontResolver};
}
