//! Error types for glyphline

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Direction;

pub type Result<T> = std::result::Result<T, GlyphlineError>;

/// Main error type for glyphline
///
/// Each stage owns one variant; nothing is retried and nothing is
/// substituted, so the first failure is the one the caller sees.
#[derive(Debug, Error)]
pub enum GlyphlineError {
    #[error("Font not found: {0}")]
    FontNotFound(#[from] FontNotFoundError),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Invalid size: {0}")]
    InvalidSize(#[from] InvalidSizeError),

    #[error("Bidi resolution failed: {0}")]
    Bidi(#[from] BidiError),

    #[error("Shaping failed: {0}")]
    Shaping(#[from] ShapingError),

    #[error("Rasterization failed: {0}")]
    Rasterization(#[from] RasterizationError),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolver errors
#[derive(Debug, Error)]
pub enum FontNotFoundError {
    #[error("no installed font family matches '{0}'")]
    Family(String),

    #[error("font file does not exist: {}", .0.display())]
    Path(PathBuf),

    #[error("family '{0}' is only available from memory, not from a file")]
    NoFileSource(String),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("font file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("font file too large: {size} bytes (max: {max} bytes) at {}", path.display())]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("invalid font data in {}: {reason}", path.display())]
    InvalidData { path: PathBuf, reason: String },
}

/// Size validation errors
#[derive(Debug, Error)]
pub enum InvalidSizeError {
    #[error("point size must be positive, got {0}")]
    Points(f32),

    #[error("device resolution must be positive, got {0} dpi")]
    Dpi(f32),

    #[error("pixel size must be positive, got {0}")]
    Pixels(f32),
}

/// Bidi errors
#[derive(Debug, Error)]
pub enum BidiError {
    #[error("{0:?} is not a paragraph direction")]
    UnsupportedDirection(Direction),
}

/// Shaping errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("font has no data to shape with")]
    EmptyFontData,

    #[error("font cannot be shaped: {0}")]
    InvalidFont(String),
}

/// Rasterization and encoding errors
#[derive(Debug, Error)]
pub enum RasterizationError {
    #[error("invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("could not allocate a {width}x{height} canvas")]
    AllocationFailed { width: u32, height: u32 },

    #[error("font cannot be rasterized: {0}")]
    InvalidFont(String),

    #[error("encoding failed: {0}")]
    EncodeFailed(String),
}
