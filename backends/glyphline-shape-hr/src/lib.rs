//! Pure Rust text shaping backend using harfrust
//!
//! Harfrust is a pure Rust port of HarfBuzz, providing text shaping without
//! any C dependencies. Positions come back in font units and are scaled to
//! the font's pixel size here, so everything downstream works in pixels.

use std::str::FromStr;

use harfrust::{
    Direction as HrDirection, Feature, FontRef as HrFontRef, GlyphBuffer, Language, Script,
    ShaperData, ShaperInstance, Tag, UnicodeBuffer, Variation,
};

use glyphline_core::{
    error::{Result, ShapingError},
    traits::{FontRef, Shaper},
    types::{Direction, ShapedGlyph, ShapingResult, TextRun},
};

/// Pure Rust text shaping powered by harfrust
#[derive(Debug, Clone, Copy, Default)]
pub struct HarfrustShaper;

impl HarfrustShaper {
    /// Creates a new harfrust shaper ready to handle any script
    pub fn new() -> Self {
        Self
    }

    /// Translates our direction enum to harfrust's format
    fn to_hr_direction(dir: Direction) -> HrDirection {
        match dir {
            Direction::LeftToRight => HrDirection::LeftToRight,
            Direction::RightToLeft => HrDirection::RightToLeft,
            Direction::TopToBottom => HrDirection::TopToBottom,
            Direction::BottomToTop => HrDirection::BottomToTop,
        }
    }

    fn from_hr_direction(dir: HrDirection) -> Direction {
        match dir {
            HrDirection::RightToLeft => Direction::RightToLeft,
            HrDirection::TopToBottom => Direction::TopToBottom,
            HrDirection::BottomToTop => Direction::BottomToTop,
            _ => Direction::LeftToRight,
        }
    }

    /// Parse a 4-character tag string into a harfrust Tag
    fn parse_tag(tag_str: &str) -> Option<Tag> {
        let bytes: [u8; 4] = tag_str.as_bytes().try_into().ok()?;
        Some(Tag::new(&bytes))
    }

    fn features(run: &TextRun) -> Vec<Feature> {
        run.features
            .iter()
            .filter_map(|(name, value)| match Self::parse_tag(name) {
                Some(tag) => Some(Feature {
                    tag,
                    value: *value,
                    start: 0,
                    end: u32::MAX,
                }),
                None => {
                    log::warn!("Invalid feature tag '{}' - skipping", name);
                    None
                },
            })
            .collect()
    }

    /// Fill the buffer, leaving harfrust to guess whatever the run left open
    fn buffer_for(run: &TextRun) -> UnicodeBuffer {
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(&run.text);

        if let Some(direction) = run.direction {
            buffer.set_direction(Self::to_hr_direction(direction));
        }
        if let Some(ref lang) = run.language {
            match Language::from_str(lang) {
                Ok(language) => buffer.set_language(language),
                Err(_) => log::warn!("Unknown language '{}' - detecting instead", lang),
            }
        }
        if let Some(ref script_str) = run.script {
            match Self::parse_tag(script_str).and_then(Script::from_iso15924_tag) {
                Some(script) => buffer.set_script(script),
                None => log::warn!("Unknown script '{}' - detecting instead", script_str),
            }
        }

        buffer.guess_segment_properties();
        buffer
    }

    /// Scale harfrust's font-unit positions to pixels
    fn extract_glyphs(buffer: &GlyphBuffer, ppem: f32, upem: u16) -> Vec<ShapedGlyph> {
        let scale = ppem / f32::from(upem);

        buffer
            .glyph_infos()
            .iter()
            .zip(buffer.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                id: info.glyph_id,
                cluster: info.cluster,
                x_advance: pos.x_advance as f32 * scale,
                y_advance: pos.y_advance as f32 * scale,
                x_offset: pos.x_offset as f32 * scale,
                y_offset: pos.y_offset as f32 * scale,
            })
            .collect()
    }
}

impl Shaper for HarfrustShaper {
    fn name(&self) -> &'static str {
        "Harfrust"
    }

    fn shape(&self, run: &TextRun, font: &dyn FontRef) -> Result<ShapingResult> {
        let ppem = font.pixels_per_em();
        if run.text.is_empty() {
            return Ok(ShapingResult::empty(
                run.direction.unwrap_or(Direction::LeftToRight),
                ppem,
            ));
        }

        let font_data = font.data();
        if font_data.is_empty() {
            return Err(ShapingError::EmptyFontData.into());
        }
        let upem = font.units_per_em();
        if upem == 0 {
            return Err(ShapingError::InvalidFont("units per em is zero".into()).into());
        }

        let hr_font = HrFontRef::from_index(font_data, font.face_index())
            .map_err(|e| ShapingError::InvalidFont(e.to_string()))?;

        // Caches font tables; rebuilt per call because the font may change between calls
        let shaper_data = ShaperData::new(&hr_font);

        let variations: Vec<Variation> = font
            .variations()
            .iter()
            .filter_map(|(tag_str, value)| {
                Self::parse_tag(tag_str).map(|tag| Variation { tag, value: *value })
            })
            .collect();
        let instance = if variations.is_empty() {
            None
        } else {
            Some(ShaperInstance::from_variations(&hr_font, variations))
        };

        let shaper = shaper_data
            .shaper(&hr_font)
            .instance(instance.as_ref())
            .point_size(Some(ppem))
            .build();

        let buffer = Self::buffer_for(run);
        let direction = Self::from_hr_direction(buffer.direction());
        let output = shaper.shape(buffer, &Self::features(run));

        let glyphs = Self::extract_glyphs(&output, ppem, upem);
        log::trace!(
            "Shaped {} chars into {} glyphs ({:?})",
            run.text.chars().count(),
            glyphs.len(),
            direction
        );

        Ok(ShapingResult {
            glyphs,
            direction,
            size: ppem,
        })
    }
}
