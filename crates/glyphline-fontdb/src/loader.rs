// this_file: crates/glyphline-fontdb/src/loader.rs

//! Font loading, size selection, and variation handling
//!
//! A [`FontHandle`] is fixed at load time: one face, one pixel size, one
//! point in the design space. Anything that needs a different size or
//! location loads a new handle.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glyphline_core::{
    error::{FontLoadError, GlyphlineError, Result},
    traits::FontRef,
    types::{AxisRequest, FontMetrics, GlyphId, ResolvedFont},
    PipelineContext, SizeSpec, Stage,
};
use read_fonts::{FileRef, TableProvider};
use skrifa::{
    instance::{Location, Size},
    string::StringId,
    MetadataProvider,
};

/// Maximum font file size (50MB) to prevent resource exhaustion.
pub const MAX_FONT_SIZE: u64 = 50 * 1024 * 1024;

/// One variation axis as the font declares it
#[derive(Debug, Clone, PartialEq)]
pub struct AxisInfo {
    /// Four-character tag, e.g. `wght`
    pub tag: String,
    /// Display name from the `name` table, e.g. `Weight`
    pub name: String,
    pub min: f32,
    pub default: f32,
    pub max: f32,
}

impl AxisInfo {
    /// Requests match by display name or by tag, case-sensitively
    pub fn matches(&self, requested: &str) -> bool {
        self.name == requested || self.tag == requested
    }

    /// Finite bounds with `min <= default <= max`
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite()
            && self.default.is_finite()
            && self.max.is_finite()
            && self.min <= self.default
            && self.default <= self.max
    }

    /// `(low, high)` in order, whichever way round the font stored them
    fn bounds(&self) -> (f32, f32) {
        (self.min.min(self.max), self.min.max(self.max))
    }
}

/// What became of a set of axis requests against one font
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisResolution {
    /// `(tag, clamped value)` in the font's axis order
    pub applied: Vec<(String, f32)>,
    /// Requests that matched no axis
    pub ignored: Vec<AxisRequest>,
}

/// Match requests to axes and clamp each value into its axis range
///
/// A later request for the same axis replaces an earlier one. Requests
/// that match nothing, or carry a non-finite value, are ignored.
pub fn resolve_axis_requests(axes: &[AxisInfo], requests: &[AxisRequest]) -> AxisResolution {
    let mut values: Vec<Option<f32>> = vec![None; axes.len()];
    let mut ignored = Vec::new();

    for request in requests {
        let Some(index) = axes.iter().position(|axis| axis.matches(&request.name)) else {
            log::warn!("Unknown variation axis '{}' - ignoring", request.name);
            ignored.push(request.clone());
            continue;
        };
        if !request.value.is_finite() {
            log::warn!(
                "Axis '{}' requested with non-finite value {} - ignoring",
                request.name,
                request.value
            );
            ignored.push(request.clone());
            continue;
        }

        let axis = &axes[index];
        let (lo, hi) = axis.bounds();
        let clamped = request.value.max(lo).min(hi);
        if clamped != request.value {
            log::warn!(
                "Axis '{}' clamped from {} to {} (font bounds: [{}, {}])",
                axis.tag,
                request.value,
                clamped,
                lo,
                hi
            );
        }
        values[index] = Some(clamped);
    }

    let applied = axes
        .iter()
        .zip(values)
        .filter_map(|(axis, value)| value.map(|v| (axis.tag.clone(), v)))
        .collect();

    AxisResolution { applied, ignored }
}

/// Horizontal metrics and ink box of one glyph, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphMetrics {
    pub advance_width: f32,
    /// Ink box, y up; all zero for empty glyphs such as space
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

/// A loaded face at a fixed size and variation
pub struct FontHandle {
    data: Vec<u8>,
    path: PathBuf,
    face_index: u32,
    size: SizeSpec,
    ppem: f32,
    units_per_em: u16,
    axes: Vec<AxisInfo>,
    requested: Vec<AxisRequest>,
    applied: Vec<(String, f32)>,
    ignored: Vec<AxisRequest>,
    location: Location,
    metrics: FontMetrics,
}

impl FontHandle {
    fn font_ref(&self) -> Option<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.face_index).ok()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> SizeSpec {
        self.size
    }

    /// Every axis the face declares; empty for static fonts
    pub fn axes(&self) -> &[AxisInfo] {
        &self.axes
    }

    pub fn is_variable(&self) -> bool {
        !self.axes.is_empty()
    }

    pub fn requested_axes(&self) -> &[AxisRequest] {
        &self.requested
    }

    /// Requests that matched no axis of this face
    pub fn ignored_axes(&self) -> &[AxisRequest] {
        &self.ignored
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Design-space position in normalized `[-1, 1]` coordinates, one per axis
    pub fn normalized_coords(&self) -> Vec<f32> {
        self.location
            .coords()
            .iter()
            .map(|coord| coord.to_f32())
            .collect()
    }

    pub fn family_name(&self) -> Option<String> {
        let font = self.font_ref()?;
        font.localized_strings(StringId::FAMILY_NAME)
            .english_or_first()
            .map(|name| name.to_string())
    }

    pub fn glyph_count(&self) -> Option<u32> {
        let font = read_fonts::FontRef::from_index(&self.data, self.face_index).ok()?;
        font.maxp().ok().map(|maxp| u32::from(maxp.num_glyphs()))
    }

    /// Advance and ink box at this handle's size and location
    pub fn glyph_metrics(&self, glyph_id: GlyphId) -> Option<GlyphMetrics> {
        let font = self.font_ref()?;
        let metrics = font.glyph_metrics(Size::new(self.ppem), &self.location);
        let gid = skrifa::GlyphId::new(glyph_id);
        let advance_width = metrics.advance_width(gid)?;
        let bounds = metrics.bounds(gid);

        Some(GlyphMetrics {
            advance_width,
            x_min: bounds.map_or(0.0, |b| b.x_min),
            y_min: bounds.map_or(0.0, |b| b.y_min),
            x_max: bounds.map_or(0.0, |b| b.x_max),
            y_max: bounds.map_or(0.0, |b| b.y_max),
        })
    }
}

impl FontRef for FontHandle {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn pixels_per_em(&self) -> f32 {
        self.ppem
    }

    fn variations(&self) -> &[(String, f32)] {
        &self.applied
    }

    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.font_ref()?
            .charmap()
            .map(ch)
            .map(|gid| gid.to_u32())
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("path", &self.path)
            .field("face_index", &self.face_index)
            .field("ppem", &self.ppem)
            .field("applied", &self.applied)
            .field("ignored", &self.ignored)
            .finish()
    }
}

/// Reads font files into sized, varied handles
#[derive(Debug, Clone)]
pub struct FontLoader {
    max_file_size: u64,
}

impl FontLoader {
    pub fn new() -> Self {
        Self {
            max_file_size: MAX_FONT_SIZE,
        }
    }

    /// Refuse files bigger than this many bytes
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Load whatever the resolver found
    pub fn load_resolved(
        &self,
        resolved: &ResolvedFont,
        size: SizeSpec,
        axes: &[AxisRequest],
    ) -> Result<FontHandle> {
        self.load(&resolved.path, resolved.face_index, size, axes)
    }

    /// Read a font file and fix its size and variation
    pub fn load(
        &self,
        path: &Path,
        face_index: u32,
        size: SizeSpec,
        axes: &[AxisRequest],
    ) -> Result<FontHandle> {
        size.validate()?;

        let meta = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FontLoadError::FileNotFound(path.to_path_buf()),
            _ => FontLoadError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        if meta.len() > self.max_file_size {
            return Err(FontLoadError::TooLarge {
                path: path.to_path_buf(),
                size: meta.len(),
                max: self.max_file_size,
            }
            .into());
        }

        let data = fs::read(path).map_err(|e| FontLoadError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Read {} bytes from {}", data.len(), path.display());

        self.load_data(data, path, face_index, size, axes)
    }

    /// Build a handle from bytes already in memory; `path` only labels errors
    pub fn load_data(
        &self,
        data: Vec<u8>,
        path: &Path,
        face_index: u32,
        size: SizeSpec,
        axes: &[AxisRequest],
    ) -> Result<FontHandle> {
        let ppem = size.pixels_per_em()?;
        let invalid = |reason: String| FontLoadError::InvalidData {
            path: path.to_path_buf(),
            reason,
        };

        check_face_index(&data, face_index).map_err(invalid)?;

        let (units_per_em, axis_infos, resolution, location, metrics) = {
            let font = skrifa::FontRef::from_index(&data, face_index)
                .map_err(|e| invalid(format!("cannot parse face {face_index}: {e}")))?;

            let axis_infos: Vec<AxisInfo> = font
                .axes()
                .iter()
                .map(|axis| {
                    let tag = axis.tag().to_string();
                    let name = font
                        .localized_strings(axis.name_id())
                        .english_or_first()
                        .map(|name| name.to_string())
                        .unwrap_or_else(|| tag.clone());
                    AxisInfo {
                        tag,
                        name,
                        min: axis.min_value(),
                        default: axis.default_value(),
                        max: axis.max_value(),
                    }
                })
                .collect();

            if let Some(axis) = axis_infos.iter().find(|axis| !axis.is_well_formed()) {
                return Err(invalid(format!(
                    "axis '{}' has bounds min {} default {} max {}",
                    axis.tag, axis.min, axis.default, axis.max
                ))
                .into());
            }

            if axis_infos.is_empty() && !axes.is_empty() {
                log::warn!(
                    "Font {} is static but axis values were requested - ignoring",
                    path.display()
                );
            }
            let resolution = resolve_axis_requests(&axis_infos, axes);
            let location = font.axes().location(
                resolution
                    .applied
                    .iter()
                    .map(|(tag, value)| (tag.as_str(), *value)),
            );

            let scaled = font.metrics(Size::new(ppem), &location);
            let metrics = FontMetrics {
                ascent: scaled.ascent,
                descent: scaled.descent,
                line_gap: scaled.leading,
            };
            (scaled.units_per_em, axis_infos, resolution, location, metrics)
        };

        if units_per_em == 0 {
            return Err(invalid("units per em is zero".into()).into());
        }

        log::debug!(
            "Loaded {} face {} at {:.2} ppem with {:?}",
            path.display(),
            face_index,
            ppem,
            resolution.applied
        );

        Ok(FontHandle {
            data,
            path: path.to_path_buf(),
            face_index,
            size,
            ppem,
            units_per_em,
            axes: axis_infos,
            requested: axes.to_vec(),
            applied: resolution.applied,
            ignored: resolution.ignored,
            location,
            metrics,
        })
    }
}

impl Default for FontLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for FontLoader {
    fn name(&self) -> &'static str {
        "FontLoading"
    }

    fn process(&self, context: &mut PipelineContext) -> Result<()> {
        let resolved = context
            .resolved()
            .ok_or_else(|| GlyphlineError::Pipeline("No font resolved".into()))?;
        let handle = self.load_resolved(resolved, context.size(), context.axes())?;
        context.set_font(Arc::new(handle));
        Ok(())
    }
}

/// Collections must contain the face; single fonts only have face 0
fn check_face_index(data: &[u8], face_index: u32) -> std::result::Result<(), String> {
    match FileRef::new(data).map_err(|e| format!("not a font file: {e}"))? {
        FileRef::Font(_) if face_index == 0 => Ok(()),
        FileRef::Font(_) => Err(format!(
            "face index {face_index} requested from a single-face file"
        )),
        FileRef::Collection(collection) => {
            let faces = u32::try_from(collection.len()).unwrap_or(u32::MAX);
            if face_index < faces {
                Ok(())
            } else {
                Err(format!(
                    "face index {face_index} out of range ({faces} faces)"
                ))
            }
        },
    }
}
