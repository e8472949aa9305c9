//! The engine that drives text through the stages to become a PNG

// this_file: crates/glyphline-core/src/pipeline.rs

use crate::{
    context::PipelineContext,
    error::{GlyphlineError, Result},
    traits::{Exporter, FontRef, Renderer, Shaper, Stage},
    types::{BidiText, ShapingResult, TextRun},
    RenderParams,
};
use std::sync::Arc;

/// Pipeline for text rendering
///
/// ## `process()` - Direct Backend Execution
/// Chains the three backends over a font you already hold:
/// shape, render, export.
///
/// ## `execute()` - Stage-Based Execution
/// Runs every stage in order against a caller-owned context. Resolver,
/// loader and bidi stages live in their backend crates and are added
/// with [`PipelineBuilder::stage`]; without custom stages the pipeline
/// runs Shaping, Rendering and Export.
///
/// ```ignore
/// use glyphline_core::Pipeline;
///
/// let pipeline = Pipeline::builder()
///     .shaper(my_shaper)
///     .renderer(my_renderer)
///     .exporter(my_exporter)
///     .build()?;
///
/// let png = pipeline.process(&TextRun::new("Hello"), font, &RenderParams::default())?;
/// ```
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    shaper: Option<Arc<dyn Shaper>>,
    renderer: Option<Arc<dyn Renderer>>,
    exporter: Option<Arc<dyn Exporter>>,
}

impl Pipeline {
    /// Start building a new pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Names of the stages `execute()` will run, in order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Shape, render and encode one run with an already loaded font
    pub fn process(
        &self,
        run: &TextRun,
        font: Arc<dyn FontRef>,
        render_params: &RenderParams,
    ) -> Result<Vec<u8>> {
        let shaper = self
            .shaper
            .as_ref()
            .ok_or_else(|| GlyphlineError::Config("No shaper configured".into()))?;
        let renderer = self
            .renderer
            .as_ref()
            .ok_or_else(|| GlyphlineError::Config("No renderer configured".into()))?;
        let exporter = self
            .exporter
            .as_ref()
            .ok_or_else(|| GlyphlineError::Config("No exporter configured".into()))?;

        let shaped = shaper.shape(run, font.as_ref())?;
        let rendered = renderer.render(&shaped, font.as_ref(), render_params)?;
        exporter.export(&rendered)
    }

    /// Run every stage against the context
    ///
    /// The first stage to fail stops the run; whatever earlier stages
    /// stored stays in the context.
    pub fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        // Backends need to know where they live
        if let Some(shaper) = &self.shaper {
            context.set_shaper(shaper.clone());
        }
        if let Some(renderer) = &self.renderer {
            context.set_renderer(renderer.clone());
        }
        if let Some(exporter) = &self.exporter {
            context.set_exporter(exporter.clone());
        }

        for stage in &self.stages {
            log::debug!("Executing stage: {}", stage.name());
            stage.process(context)?;
        }

        Ok(())
    }
}

/// Build pipelines piece by piece
///
/// ```ignore
/// // Backends only; the default stages do the rest
/// let pipeline = Pipeline::builder()
///     .shaper(Arc::new(HarfrustShaper::new()))
///     .renderer(Arc::new(SkiaRasterizer::new()))
///     .exporter(Arc::new(PngExporter::new()))
///     .build()?;
///
/// // Full control over the stage list
/// let pipeline = Pipeline::builder()
///     .stage(Box::new(FontResolver::system()))
///     .stage(Box::new(FontLoader::new()))
///     .stage(Box::new(ShapingStage))
///     .shaper(my_shaper)
///     .build()?;
/// ```
pub struct PipelineBuilder {
    stages: Vec<Box<dyn Stage>>,
    shaper: Option<Arc<dyn Shaper>>,
    renderer: Option<Arc<dyn Renderer>>,
    exporter: Option<Arc<dyn Exporter>>,
}

impl PipelineBuilder {
    /// Start with a clean slate
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            shaper: None,
            renderer: None,
            exporter: None,
        }
    }

    /// Add your own stage to the flow
    pub fn stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Choose who turns characters into glyphs
    pub fn shaper(mut self, shaper: Arc<dyn Shaper>) -> Self {
        self.shaper = Some(shaper);
        self
    }

    /// Choose who turns glyphs into pixels
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Choose who packages the final output
    pub fn exporter(mut self, exporter: Arc<dyn Exporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Create the pipeline, ready to run
    pub fn build(self) -> Result<Pipeline> {
        let stages = if self.stages.is_empty() {
            vec![
                Box::new(ShapingStage) as Box<dyn Stage>,
                Box::new(RenderingStage) as Box<dyn Stage>,
                Box::new(ExportStage) as Box<dyn Stage>,
            ]
        } else {
            self.stages
        };

        Ok(Pipeline {
            stages,
            shaper: self.shaper,
            renderer: self.renderer,
            exporter: self.exporter,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape the context's text with its shaper
///
/// When bidi resolution ran, every run is shaped on its own in its own
/// direction and the results are laid end to end in visual order, with
/// clusters pointing back into the logical text.
pub struct ShapingStage;

impl Stage for ShapingStage {
    fn name(&self) -> &'static str {
        "Shaping"
    }

    fn process(&self, context: &mut PipelineContext) -> Result<()> {
        let shaper = context
            .shaper()
            .ok_or_else(|| GlyphlineError::Pipeline("No shaper configured".into()))?;
        let font = context
            .font()
            .ok_or_else(|| GlyphlineError::Pipeline("No font loaded".into()))?;

        log::debug!("Shaping text with backend: {}", shaper.name());
        let shaped = match context.bidi() {
            Some(bidi) => shape_bidi_runs(shaper.as_ref(), context.text_run(), bidi, font.as_ref())?,
            None => shaper.shape(context.text_run(), font.as_ref())?,
        };
        log::debug!("Shaped {} glyphs", shaped.glyphs.len());

        context.set_shaped(shaped);
        Ok(())
    }
}

/// Shape each visual run separately and concatenate
pub fn shape_bidi_runs(
    shaper: &dyn Shaper,
    run: &TextRun,
    bidi: &BidiText,
    font: &dyn FontRef,
) -> Result<ShapingResult> {
    let mut combined = ShapingResult::empty(bidi.base_direction, font.pixels_per_em());

    for bidi_run in &bidi.runs {
        let piece = run
            .with_text(bidi_run.text.as_str())
            .with_direction(bidi_run.direction);
        let shaped = shaper.shape(&piece, font)?;
        let offset = u32::try_from(bidi_run.range.0)
            .map_err(|_| GlyphlineError::Pipeline("text too long to shape".into()))?;
        combined.append(shaped, offset);
    }

    Ok(combined)
}

/// Paint the shaped glyphs with the context's renderer
pub struct RenderingStage;

impl Stage for RenderingStage {
    fn name(&self) -> &'static str {
        "Rendering"
    }

    fn process(&self, context: &mut PipelineContext) -> Result<()> {
        let renderer = context
            .renderer()
            .ok_or_else(|| GlyphlineError::Pipeline("No renderer configured".into()))?;
        let font = context
            .font()
            .ok_or_else(|| GlyphlineError::Pipeline("No font loaded".into()))?;
        let shaped = context
            .shaped()
            .ok_or_else(|| GlyphlineError::Pipeline("No shaped result available".into()))?;

        log::debug!("Rendering with backend: {}", renderer.name());
        let bitmap = renderer.render(shaped, font.as_ref(), context.render_params())?;

        context.set_bitmap(bitmap);
        Ok(())
    }
}

/// Encode the bitmap and, when an output path is set, write it out
pub struct ExportStage;

impl Stage for ExportStage {
    fn name(&self) -> &'static str {
        "Export"
    }

    fn process(&self, context: &mut PipelineContext) -> Result<()> {
        let Some(exporter) = context.exporter() else {
            return Ok(());
        };
        let bitmap = context
            .bitmap()
            .ok_or_else(|| GlyphlineError::Pipeline("No bitmap available".into()))?;

        log::debug!("Exporting with backend: {}", exporter.name());
        let encoded = exporter.export(bitmap)?;

        if let Some(path) = context.output_path() {
            std::fs::write(path, &encoded)?;
            log::info!("Wrote {} bytes to {}", encoded.len(), path.display());
        }

        context.set_encoded(encoded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        BidiRun, BitmapData, BitmapFormat, Direction, FontMetrics, GlyphId, ShapedGlyph,
    };
    use std::sync::Mutex;

    // Mock implementations for testing
    struct MockShaper;
    impl Shaper for MockShaper {
        fn name(&self) -> &'static str {
            "MockShaper"
        }
        fn shape(&self, run: &TextRun, font: &dyn FontRef) -> Result<ShapingResult> {
            let direction = run.direction.unwrap_or(Direction::LeftToRight);
            let mut glyphs: Vec<ShapedGlyph> = run
                .text
                .char_indices()
                .map(|(i, c)| ShapedGlyph {
                    id: c as u32,
                    cluster: i as u32,
                    x_advance: 10.0,
                    y_advance: 0.0,
                    x_offset: 0.0,
                    y_offset: 0.0,
                })
                .collect();
            if direction == Direction::RightToLeft {
                glyphs.reverse();
            }
            Ok(ShapingResult {
                glyphs,
                direction,
                size: font.pixels_per_em(),
            })
        }
    }

    /// Records the directions it was asked to shape in
    #[derive(Default)]
    struct RecordingShaper {
        calls: Mutex<Vec<(String, Option<Direction>)>>,
    }
    impl Shaper for RecordingShaper {
        fn name(&self) -> &'static str {
            "RecordingShaper"
        }
        fn shape(&self, run: &TextRun, font: &dyn FontRef) -> Result<ShapingResult> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((run.text.clone(), run.direction));
            }
            MockShaper.shape(run, font)
        }
    }

    struct MockRenderer;
    impl Renderer for MockRenderer {
        fn name(&self) -> &'static str {
            "MockRenderer"
        }
        fn render(
            &self,
            shaped: &ShapingResult,
            _font: &dyn FontRef,
            _params: &RenderParams,
        ) -> Result<BitmapData> {
            let width = shaped.total_advance().0 as u32 + 1;
            let height = shaped.size as u32 + 1;
            Ok(BitmapData {
                width,
                height,
                format: BitmapFormat::Rgba8,
                data: vec![0u8; (width * height * 4) as usize],
            })
        }
    }

    struct MockExporter;
    impl Exporter for MockExporter {
        fn name(&self) -> &'static str {
            "MockExporter"
        }
        fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
            Ok(bitmap.data.clone())
        }
    }

    struct MockFont;
    impl FontRef for MockFont {
        fn data(&self) -> &[u8] {
            &[]
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
        fn glyph_id(&self, ch: char) -> Option<GlyphId> {
            Some(ch as u32)
        }
    }

    fn full_pipeline() -> Pipeline {
        match Pipeline::builder()
            .shaper(Arc::new(MockShaper))
            .renderer(Arc::new(MockRenderer))
            .exporter(Arc::new(MockExporter))
            .build()
        {
            Ok(pipeline) => pipeline,
            Err(e) => unreachable!("pipeline build failed: {e}"),
        }
    }

    #[test]
    fn test_pipeline_builder() {
        let pipeline = Pipeline::builder()
            .shaper(Arc::new(MockShaper))
            .renderer(Arc::new(MockRenderer))
            .exporter(Arc::new(MockExporter))
            .build();

        assert!(pipeline.is_ok());
    }

    #[test]
    fn test_pipeline_process() {
        let pipeline = full_pipeline();
        let result = pipeline.process(
            &TextRun::new("Hello"),
            Arc::new(MockFont),
            &RenderParams::default(),
        );
        match result {
            Ok(bytes) => assert!(!bytes.is_empty()),
            Err(e) => unreachable!("pipeline process failed: {e}"),
        }
    }

    #[test]
    fn test_pipeline_missing_shaper() {
        let pipeline = match Pipeline::builder()
            .renderer(Arc::new(MockRenderer))
            .exporter(Arc::new(MockExporter))
            .build()
        {
            Ok(pipeline) => pipeline,
            Err(e) => unreachable!("pipeline build failed: {e}"),
        };

        let result = pipeline.process(
            &TextRun::new("Hello"),
            Arc::new(MockFont),
            &RenderParams::default(),
        );
        assert!(matches!(result, Err(GlyphlineError::Config(_))));
    }

    #[test]
    fn test_pipeline_missing_exporter() {
        let pipeline = match Pipeline::builder()
            .shaper(Arc::new(MockShaper))
            .renderer(Arc::new(MockRenderer))
            .build()
        {
            Ok(pipeline) => pipeline,
            Err(e) => unreachable!("pipeline build failed: {e}"),
        };

        let result = pipeline.process(
            &TextRun::new("Hello"),
            Arc::new(MockFont),
            &RenderParams::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_default_stage_names() {
        let pipeline = full_pipeline();
        assert_eq!(pipeline.stage_names(), ["Shaping", "Rendering", "Export"]);
    }

    #[test]
    fn test_execute_fills_context() {
        let pipeline = full_pipeline();
        let mut context = PipelineContext::new("Test", "test.ttf");
        context.set_font(Arc::new(MockFont));

        if let Err(e) = pipeline.execute(&mut context) {
            unreachable!("execute failed: {e}");
        }

        assert_eq!(context.shaped().map(|s| s.glyphs.len()), Some(4));
        assert!(context.bitmap().is_some());
        assert!(context.encoded().is_some());
    }

    #[test]
    fn test_execute_without_font_fails_at_shaping() {
        let pipeline = full_pipeline();
        let mut context = PipelineContext::new("Test", "test.ttf");

        let result = pipeline.execute(&mut context);
        assert!(matches!(result, Err(GlyphlineError::Pipeline(_))));
        assert!(context.shaped().is_none());
        assert!(context.bitmap().is_none());
    }

    #[test]
    fn test_export_writes_output_path() {
        let dir = std::env::temp_dir().join(format!("glyphline-core-{}", std::process::id()));
        if let Err(e) = std::fs::create_dir_all(&dir) {
            unreachable!("cannot create temp dir: {e}");
        }
        let out = dir.join("out.bin");

        let pipeline = full_pipeline();
        let mut context = PipelineContext::new("Hi", "test.ttf");
        context.set_font(Arc::new(MockFont));
        context.set_output_path(&out);

        if let Err(e) = pipeline.execute(&mut context) {
            unreachable!("execute failed: {e}");
        }

        let written = std::fs::read(&out).unwrap_or_default();
        assert_eq!(Some(written.as_slice()), context.encoded());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_text_still_renders_a_canvas() {
        let pipeline = full_pipeline();
        let result = pipeline.process(
            &TextRun::new(""),
            Arc::new(MockFont),
            &RenderParams::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_bidi_runs_are_shaped_separately_in_visual_order() {
        let shaper = RecordingShaper::default();
        let logical = "ab \u{5d0}\u{5d1}";
        let bidi = BidiText {
            logical: logical.to_string(),
            visual: "ab \u{5d1}\u{5d0}".to_string(),
            base_direction: Direction::LeftToRight,
            runs: vec![
                BidiRun {
                    text: "ab ".to_string(),
                    range: (0, 3),
                    direction: Direction::LeftToRight,
                },
                BidiRun {
                    text: "\u{5d0}\u{5d1}".to_string(),
                    range: (3, 7),
                    direction: Direction::RightToLeft,
                },
            ],
        };

        let shaped = match shape_bidi_runs(&shaper, &TextRun::new(logical), &bidi, &MockFont) {
            Ok(shaped) => shaped,
            Err(e) => unreachable!("shaping failed: {e}"),
        };

        let calls = shaper.calls.lock().map(|c| c.clone()).unwrap_or_default();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1, Some(Direction::RightToLeft));

        // The RTL run comes out reversed, its clusters shifted past "ab "
        let clusters: Vec<u32> = shaped.glyphs.iter().map(|g| g.cluster).collect();
        assert_eq!(clusters, vec![0, 1, 2, 5, 3]);
        assert_eq!(shaped.direction, Direction::LeftToRight);
    }
}
