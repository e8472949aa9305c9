// this_file: crates/glyphline-unicode/src/lib.rs

//! Bidirectional reordering: logical text in, visual runs out.

use glyphline_core::{
    error::Result,
    types::{BaseDirection, BidiRun, BidiText, Direction},
    PipelineContext, Stage,
};
use unicode_bidi::{bidi_class, BidiClass, BidiInfo, Level};

/// Resolves paragraph direction and reorders text for display
#[derive(Debug, Clone, Copy, Default)]
pub struct BidiNormalizer;

impl BidiNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Reorder `text` into display order
    ///
    /// Runs come back left to right as they will be drawn. Each run keeps
    /// its characters in logical order so it can be shaped on its own.
    pub fn normalize(&self, text: &str, base: BaseDirection) -> Result<BidiText> {
        let base_direction = match base {
            BaseDirection::LeftToRight => Direction::LeftToRight,
            BaseDirection::RightToLeft => Direction::RightToLeft,
            BaseDirection::Auto => detect_base_direction(text),
        };

        if text.is_empty() {
            return Ok(BidiText {
                logical: String::new(),
                visual: String::new(),
                base_direction,
                runs: Vec::new(),
            });
        }

        let level = match base_direction {
            Direction::RightToLeft => Level::rtl(),
            _ => Level::ltr(),
        };
        let bidi = BidiInfo::new(text, Some(level));

        let mut visual = String::with_capacity(text.len());
        let mut runs = Vec::new();

        for paragraph in &bidi.paragraphs {
            let line = paragraph.range.clone();
            visual.push_str(&bidi.reorder_line(paragraph, line.clone()));

            let (levels, level_runs) = bidi.visual_runs(paragraph, line);
            for run in level_runs {
                if run.start >= run.end {
                    continue;
                }
                let run_level = levels.get(run.start).copied().unwrap_or(paragraph.level);
                let direction = if run_level.is_rtl() {
                    Direction::RightToLeft
                } else {
                    Direction::LeftToRight
                };
                runs.push(BidiRun {
                    text: text[run.clone()].to_string(),
                    range: (run.start, run.end),
                    direction,
                });
            }
        }

        log::debug!(
            "Bidi: {} bytes, base {:?}, {} runs",
            text.len(),
            base_direction,
            runs.len()
        );

        Ok(BidiText {
            logical: text.to_string(),
            visual,
            base_direction,
            runs,
        })
    }
}

/// Right-to-left only when every strong character is right-to-left
///
/// Mixed, neutral-only and empty text all come out left-to-right.
pub fn detect_base_direction(text: &str) -> Direction {
    let mut saw_rtl = false;
    for ch in text.chars() {
        match bidi_class(ch) {
            BidiClass::L => return Direction::LeftToRight,
            BidiClass::R | BidiClass::AL => saw_rtl = true,
            _ => {},
        }
    }
    if saw_rtl {
        Direction::RightToLeft
    } else {
        Direction::LeftToRight
    }
}

impl Stage for BidiNormalizer {
    fn name(&self) -> &'static str {
        "BidiResolution"
    }

    fn process(&self, context: &mut PipelineContext) -> Result<()> {
        let Some(default_base) = context.base_direction() else {
            log::trace!("BidiResolution: disabled");
            return Ok(());
        };

        // An explicit run direction wins; vertical text has no bidi
        let base = match context.text_run().direction {
            Some(direction) if direction.is_vertical() => {
                log::debug!("BidiResolution: skipped for vertical text");
                return Ok(());
            },
            Some(direction) => BaseDirection::from_direction(direction)?,
            None => default_base,
        };

        let bidi = self.normalize(context.text(), base)?;
        context.set_bidi(bidi);
        Ok(())
    }
}

#[cfg(test)]
mod proptests;
