//! Export for glyphline
//!
//! Pixels leave the pipeline as PNG bytes; shaped glyphs can leave as a
//! human- or machine-readable report for debugging.

pub mod diagnostics;
pub mod png;

pub use diagnostics::{GlyphReport, GlyphReportEntry};
pub use png::{encode_bitmap_to_png, PngExporter};
