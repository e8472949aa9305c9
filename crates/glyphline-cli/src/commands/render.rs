//! Render command implementation

use std::sync::Arc;

use glyphline::error::{GlyphlineError, Result};
use glyphline::export::{GlyphReport, PngExporter};
use glyphline::fontdb::{FontHandle, FontLoader};
use glyphline::render_skia::SkiaRasterizer;
use glyphline::shape_hr::HarfrustShaper;
use glyphline::traits::FontRef;
use glyphline::types::{AxisRequest, BaseDirection, TextRun};
use glyphline::{Pipeline, PipelineContext, PipelineOptions, RenderParams, SizeSpec};

use super::{parse_axis, parse_color, parse_direction, parse_features};
use crate::cli::{RenderArgs, VariableArgs};

const VARIABLE_SIZE: f32 = 72.0;
const VARIABLE_TEXT: &str = "Hello, World!";

fn size_from_args(args: &RenderArgs) -> SizeSpec {
    match (args.size_px, args.points) {
        (Some(px), _) => SizeSpec::Pixels(px),
        (None, Some(points)) => SizeSpec::Points {
            points,
            dpi: args.dpi,
        },
        (None, None) => SizeSpec::default(),
    }
}

fn options_from_args(args: &RenderArgs) -> Result<PipelineOptions> {
    let axes = args
        .axes
        .iter()
        .map(|axis| parse_axis(axis))
        .collect::<Result<Vec<_>>>()?;

    Ok(PipelineOptions {
        font: args.font.clone(),
        size: size_from_args(args),
        axes,
        direction: parse_direction(&args.direction)?,
        script: args.script.clone(),
        language: args.language.clone(),
        features: parse_features(args.features.as_deref())?,
        bidi: (!args.no_bidi).then_some(BaseDirection::Auto),
        render: RenderParams {
            foreground: parse_color(&args.foreground)?,
            background: parse_color(&args.background)?,
            margin: args.margin,
            ..RenderParams::default()
        },
        font_dirs: args.font_dirs.clone(),
        ..PipelineOptions::default()
    })
}

fn print_summary(context: &PipelineContext) {
    if let (Some(path), Some(bitmap)) = (context.output_path(), context.bitmap()) {
        println!(
            "{}: {}x{} pixels, {} glyphs",
            path.display(),
            bitmap.width,
            bitmap.height,
            context.shaped().map_or(0, |shaped| shaped.glyphs.len())
        );
    }
}

pub fn run_render(args: &RenderArgs) -> Result<()> {
    let options = options_from_args(args)?;
    log::debug!("Render options: {:?}", options);

    let context = glyphline::render_to_file(&args.text, &options, &args.output)?;

    if args.dump_glyphs {
        if let Some(shaped) = context.shaped() {
            let report = GlyphReport::new(shaped);
            if args.json {
                println!("{}", report.to_json(true)?);
            } else {
                print!("{}", report);
            }
        }
    }

    print_summary(&context);
    Ok(())
}

/// Weight and Width by axis display name, only when given
fn variable_axes(args: &VariableArgs) -> Vec<AxisRequest> {
    [("Weight", args.weight), ("Width", args.width)]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| AxisRequest::new(name, v)))
        .collect()
}

fn describe_variation(font: &FontHandle) {
    if !font.is_variable() {
        println!("Static font: no variation axes");
        return;
    }
    println!("Variable font with {} axes", font.axes().len());
    for axis in font.axes() {
        let value = font
            .variations()
            .iter()
            .find(|(tag, _)| *tag == axis.tag)
            .map_or(axis.default, |(_, value)| *value);
        println!("  {} ({}): {}", axis.name, axis.tag, value);
    }
}

pub fn run_variable(args: &VariableArgs) -> Result<()> {
    let options = PipelineOptions {
        font: args.font.clone(),
        size: SizeSpec::Pixels(VARIABLE_SIZE),
        axes: variable_axes(args),
        bidi: None,
        ..PipelineOptions::default()
    };
    let text = args.text.as_deref().unwrap_or(VARIABLE_TEXT);

    let resolved = options.resolver().resolve(&options.font)?;
    let font = Arc::new(FontLoader::new().load_resolved(&resolved, options.size, &options.axes)?);
    describe_variation(&font);

    let pipeline = Pipeline::builder()
        .shaper(Arc::new(HarfrustShaper::new()))
        .renderer(Arc::new(SkiaRasterizer::new()))
        .exporter(Arc::new(PngExporter::new()))
        .build()?;

    let png = pipeline.process(
        &TextRun::new(text),
        font.clone() as Arc<dyn FontRef>,
        &options.render,
    )?;
    std::fs::write(&args.output, &png).map_err(GlyphlineError::Io)?;
    println!("{}: {} bytes", args.output.display(), png.len());
    Ok(())
}
