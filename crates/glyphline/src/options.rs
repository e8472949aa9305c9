//! One set of knobs for the whole pipeline, and the functions that run it

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glyphline_core::{
    error::Result,
    types::{AxisRequest, BaseDirection, Direction, TextRun},
    ExportStage, Pipeline, PipelineContext, RenderParams, RenderingStage, ShapingStage, SizeSpec,
};
use glyphline_export::PngExporter;
use glyphline_fontdb::{FontLoader, FontResolver};
use glyphline_render_skia::SkiaRasterizer;
use glyphline_shape_hr::HarfrustShaper;
use glyphline_unicode::BidiNormalizer;

/// Everything a render needs besides the text
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Family name (`Noto Sans`, `serif`) or font file path
    pub font: String,
    pub size: SizeSpec,
    pub axes: Vec<AxisRequest>,
    /// Forces the shaping direction; `None` lets the text decide
    pub direction: Option<Direction>,
    pub script: Option<String>,
    pub language: Option<String>,
    pub features: Vec<(String, u32)>,
    /// Paragraph direction for bidi reordering; `None` skips reordering
    pub bidi: Option<BaseDirection>,
    pub render: RenderParams,
    /// Extra directories searched for families
    pub font_dirs: Vec<PathBuf>,
    /// Also search the installed system fonts
    pub system_fonts: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            font: "sans-serif".into(),
            size: SizeSpec::Pixels(72.0),
            axes: Vec::new(),
            direction: None,
            script: None,
            language: None,
            features: Vec::new(),
            bidi: Some(BaseDirection::Auto),
            render: RenderParams::default(),
            font_dirs: Vec::new(),
            system_fonts: true,
        }
    }
}

impl PipelineOptions {
    /// A resolver over the configured directories
    ///
    /// An existing font file is used as is, so the system scan is skipped.
    pub fn resolver(&self) -> FontResolver {
        let mut resolver = if self.system_fonts && !Path::new(&self.font).is_file() {
            FontResolver::system()
        } else {
            FontResolver::empty()
        };
        for dir in &self.font_dirs {
            resolver.add_font_dir(dir);
        }
        resolver
    }

    pub fn text_run(&self, text: &str) -> TextRun {
        TextRun {
            text: text.to_string(),
            direction: self.direction,
            script: self.script.clone(),
            language: self.language.clone(),
            features: self.features.clone(),
        }
    }

    /// A fresh context holding `text` and every setting
    pub fn context(&self, text: &str) -> PipelineContext {
        let mut context = PipelineContext::new(text, self.font.as_str());
        context.set_text_run(self.text_run(text));
        context.set_size(self.size);
        context.set_axes(self.axes.clone());
        context.set_base_direction(self.bidi);
        context.set_render_params(self.render.clone());
        context
    }
}

/// All six stages with the default backends
pub fn build_pipeline(resolver: FontResolver) -> Result<Pipeline> {
    Pipeline::builder()
        .stage(Box::new(resolver))
        .stage(Box::new(FontLoader::new()))
        .stage(Box::new(BidiNormalizer::new()))
        .stage(Box::new(ShapingStage))
        .stage(Box::new(RenderingStage))
        .stage(Box::new(ExportStage))
        .shaper(Arc::new(HarfrustShaper::new()))
        .renderer(Arc::new(SkiaRasterizer::new()))
        .exporter(Arc::new(PngExporter::new()))
        .build()
}

/// Run the pipeline and hand back everything it produced
///
/// The PNG bytes are in [`PipelineContext::encoded`]; nothing is written.
pub fn render(text: &str, options: &PipelineOptions) -> Result<PipelineContext> {
    let pipeline = build_pipeline(options.resolver())?;
    let mut context = options.context(text);
    pipeline.execute(&mut context)?;
    Ok(context)
}

/// Run the pipeline and write the PNG to `path`, replacing any file there
pub fn render_to_file(
    text: &str,
    options: &PipelineOptions,
    path: impl AsRef<Path>,
) -> Result<PipelineContext> {
    let pipeline = build_pipeline(options.resolver())?;
    let mut context = options.context(text);
    context.set_output_path(path.as_ref());
    pipeline.execute(&mut context)?;
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphline_core::error::{FontNotFoundError, GlyphlineError};

    fn offline() -> PipelineOptions {
        PipelineOptions {
            system_fonts: false,
            ..PipelineOptions::default()
        }
    }

    #[test]
    fn test_defaults() {
        let options = PipelineOptions::default();
        assert_eq!(options.font, "sans-serif");
        assert_eq!(options.size, SizeSpec::Pixels(72.0));
        assert_eq!(options.bidi, Some(BaseDirection::Auto));
        assert_eq!(options.render.margin_for(72.0), 36.0);
    }

    #[test]
    fn test_context_carries_every_setting() {
        let options = PipelineOptions {
            font: "Noto Sans".into(),
            size: SizeSpec::Pixels(24.0),
            axes: vec![AxisRequest::new("Weight", 700.0)],
            direction: Some(Direction::RightToLeft),
            language: Some("ar".into()),
            features: vec![("liga".into(), 0)],
            bidi: None,
            ..offline()
        };
        let context = options.context("abc");

        assert_eq!(context.text(), "abc");
        assert_eq!(context.font_spec(), "Noto Sans");
        assert_eq!(context.size(), SizeSpec::Pixels(24.0));
        assert_eq!(context.axes(), &[AxisRequest::new("Weight", 700.0)]);
        assert_eq!(context.base_direction(), None);
        assert_eq!(context.text_run().direction, Some(Direction::RightToLeft));
        assert_eq!(context.text_run().language.as_deref(), Some("ar"));
        assert_eq!(context.text_run().features, vec![("liga".to_string(), 0)]);
        assert!(context.output_path().is_none());
    }

    #[test]
    fn test_pipeline_runs_six_stages_in_order() {
        let pipeline = match build_pipeline(FontResolver::empty()) {
            Ok(pipeline) => pipeline,
            Err(e) => unreachable!("pipeline must build: {e}"),
        };
        assert_eq!(
            pipeline.stage_names(),
            vec![
                "FontResolution",
                "FontLoading",
                "BidiResolution",
                "Shaping",
                "Rendering",
                "Export"
            ]
        );
    }

    #[test]
    fn test_unknown_family_stops_at_resolution() {
        let options = PipelineOptions {
            font: "No Such Family 4f1c".into(),
            ..offline()
        };
        let result = render("Hello", &options);
        assert!(matches!(
            result,
            Err(GlyphlineError::FontNotFound(FontNotFoundError::Family(_)))
        ));
    }

    #[test]
    fn test_missing_file_stops_at_resolution() {
        let options = PipelineOptions {
            font: "./definitely/not/here.ttf".into(),
            ..offline()
        };
        let result = render_to_file("Hello", &options, "unused.png");
        assert!(matches!(
            result,
            Err(GlyphlineError::FontNotFound(FontNotFoundError::Path(_)))
        ));
        assert!(!Path::new("unused.png").exists());
    }
}
