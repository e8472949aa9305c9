//! The caller-owned container that stages read from and write to

use crate::{
    traits::{Exporter, FontRef, Renderer, Shaper},
    types::{AxisRequest, BaseDirection, BidiText, BitmapData, ResolvedFont, ShapingResult, TextRun},
    RenderParams, SizeSpec,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything one pipeline run needs, and everything it produces
///
/// Products are declared before the inputs they were made from, so
/// dropping the context releases them in reverse order of acquisition:
/// encoded bytes, bitmap, glyphs, bidi text, then the font.
pub struct PipelineContext {
    // What emerges along the way
    encoded: Option<Vec<u8>>,
    bitmap: Option<BitmapData>,
    shaped: Option<ShapingResult>,
    bidi: Option<BidiText>,
    font: Option<Arc<dyn FontRef>>,
    resolved: Option<ResolvedFont>,

    // Who does the work
    shaper: Option<Arc<dyn Shaper>>,
    renderer: Option<Arc<dyn Renderer>>,
    exporter: Option<Arc<dyn Exporter>>,

    // What we start with
    run: TextRun,
    font_spec: String,
    size: SizeSpec,
    axes: Vec<AxisRequest>,
    base_direction: Option<BaseDirection>,
    render_params: RenderParams,
    output_path: Option<PathBuf>,
}

impl PipelineContext {
    /// Start fresh with text and a font family or path
    pub fn new(text: impl Into<String>, font_spec: impl Into<String>) -> Self {
        Self {
            encoded: None,
            bitmap: None,
            shaped: None,
            bidi: None,
            font: None,
            resolved: None,
            shaper: None,
            renderer: None,
            exporter: None,
            run: TextRun::new(text),
            font_spec: font_spec.into(),
            size: SizeSpec::default(),
            axes: Vec::new(),
            base_direction: Some(BaseDirection::Auto),
            render_params: RenderParams::default(),
            output_path: None,
        }
    }

    // Read what's inside

    pub fn text(&self) -> &str {
        &self.run.text
    }

    pub fn text_run(&self) -> &TextRun {
        &self.run
    }

    pub fn font_spec(&self) -> &str {
        &self.font_spec
    }

    pub fn size(&self) -> SizeSpec {
        self.size
    }

    pub fn axes(&self) -> &[AxisRequest] {
        &self.axes
    }

    /// `None` means bidi resolution is skipped
    pub fn base_direction(&self) -> Option<BaseDirection> {
        self.base_direction
    }

    pub fn render_params(&self) -> &RenderParams {
        &self.render_params
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn shaper(&self) -> Option<Arc<dyn Shaper>> {
        self.shaper.clone()
    }

    pub fn renderer(&self) -> Option<Arc<dyn Renderer>> {
        self.renderer.clone()
    }

    pub fn exporter(&self) -> Option<Arc<dyn Exporter>> {
        self.exporter.clone()
    }

    pub fn resolved(&self) -> Option<&ResolvedFont> {
        self.resolved.as_ref()
    }

    pub fn font(&self) -> Option<Arc<dyn FontRef>> {
        self.font.clone()
    }

    pub fn bidi(&self) -> Option<&BidiText> {
        self.bidi.as_ref()
    }

    pub fn shaped(&self) -> Option<&ShapingResult> {
        self.shaped.as_ref()
    }

    pub fn bitmap(&self) -> Option<&BitmapData> {
        self.bitmap.as_ref()
    }

    pub fn encoded(&self) -> Option<&[u8]> {
        self.encoded.as_deref()
    }

    // Change what's inside

    pub fn set_text_run(&mut self, run: TextRun) {
        self.run = run;
    }

    pub fn set_size(&mut self, size: SizeSpec) {
        self.size = size;
    }

    pub fn set_axes(&mut self, axes: Vec<AxisRequest>) {
        self.axes = axes;
    }

    pub fn set_base_direction(&mut self, base_direction: Option<BaseDirection>) {
        self.base_direction = base_direction;
    }

    pub fn set_render_params(&mut self, params: RenderParams) {
        self.render_params = params;
    }

    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        self.output_path = Some(path.into());
    }

    pub fn set_shaper(&mut self, shaper: Arc<dyn Shaper>) {
        self.shaper = Some(shaper);
    }

    pub fn set_renderer(&mut self, renderer: Arc<dyn Renderer>) {
        self.renderer = Some(renderer);
    }

    pub fn set_exporter(&mut self, exporter: Arc<dyn Exporter>) {
        self.exporter = Some(exporter);
    }

    pub fn set_resolved(&mut self, resolved: ResolvedFont) {
        self.resolved = Some(resolved);
    }

    pub fn set_font(&mut self, font: Arc<dyn FontRef>) {
        self.font = Some(font);
    }

    pub fn set_bidi(&mut self, bidi: BidiText) {
        self.bidi = Some(bidi);
    }

    pub fn set_shaped(&mut self, shaped: ShapingResult) {
        self.shaped = Some(shaped);
    }

    pub fn set_bitmap(&mut self, bitmap: BitmapData) {
        self.bitmap = Some(bitmap);
    }

    pub fn set_encoded(&mut self, encoded: Vec<u8>) {
        self.encoded = Some(encoded);
    }
}

impl std::fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineContext")
            .field("text", &self.run.text)
            .field("font_spec", &self.font_spec)
            .field("size", &self.size)
            .field("resolved", &self.resolved)
            .field("font_loaded", &self.font.is_some())
            .field("bidi", &self.bidi.is_some())
            .field("glyphs", &self.shaped.as_ref().map(|s| s.glyphs.len()))
            .field("encoded_bytes", &self.encoded.as_ref().map(Vec::len))
            .finish()
    }
}
