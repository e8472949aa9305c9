//! Where fonts come from and how they get sized
//!
//! The first two stages of the pipeline. [`FontResolver`] turns a family
//! name or a path into a font file on disk; [`FontLoader`] reads that file,
//! fixes its size, and pins its variation axes into a [`FontHandle`].
//!
//! ## Memory Management
//!
//! A handle owns its font bytes and parses them on demand, so it can be
//! shared behind an `Arc` and dropped whenever the last user is done.
//! Collections (`.ttc`) are addressed by face index.

pub mod loader;
pub mod resolver;

pub use loader::{
    resolve_axis_requests, AxisInfo, AxisResolution, FontHandle, FontLoader, GlyphMetrics,
    MAX_FONT_SIZE,
};
pub use resolver::{FontResolver, GenericFamily, FONT_DIRS_ENV};
