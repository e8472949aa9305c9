//! CLI argument definitions using Clap v4

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// glyphline - render a line of text to a PNG
#[derive(Parser, Debug)]
#[command(name = "glyphline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log what every stage does
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render text to a PNG file
    #[command(alias = "r")]
    Render(Box<RenderArgs>),

    /// Render with a variable font's Weight and Width axes
    Variable(VariableArgs),

    /// Walk characters through the cmap and print where each glyph lands
    Glyphs(GlyphsArgs),

    /// List a font's variation axes
    Axes(AxesArgs),

    /// List the font families that can be resolved by name
    Families(FamiliesArgs),
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Text to render
    pub text: String,

    /// Family name (`Noto Sans`, `serif`) or font file path
    #[arg(short = 'f', long = "font", default_value = "sans-serif")]
    pub font: String,

    /// Size in pixels per em
    #[arg(short = 's', long = "size-px", conflicts_with = "points")]
    pub size_px: Option<f32>,

    /// Size in typographic points, converted through --dpi
    #[arg(short = 'p', long = "points")]
    pub points: Option<f32>,

    /// Device resolution for --points
    #[arg(long = "dpi", default_value = "72")]
    pub dpi: f32,

    /// Variation axis setting by name or tag, e.g. `Weight=700` or `wdth=75`
    #[arg(short = 'a', long = "axis", value_name = "NAME=VALUE")]
    pub axes: Vec<String>,

    /// Text direction: auto, ltr, rtl, ttb, btt
    #[arg(short = 'd', long = "direction", default_value = "auto")]
    pub direction: String,

    /// Shape the text in logical order without bidi reordering
    #[arg(long = "no-bidi")]
    pub no_bidi: bool,

    /// Script tag (ISO 15924), e.g. Latn, Arab
    #[arg(short = 'S', long = "script")]
    pub script: Option<String>,

    /// Language tag (BCP 47), e.g. en, ar
    #[arg(short = 'l', long = "language")]
    pub language: Option<String>,

    /// Font feature settings (comma or space separated): `liga`, `-kern`, `ss01=2`
    #[arg(short = 'F', long = "features", allow_hyphen_values = true)]
    pub features: Option<String>,

    /// Blank border in pixels (default: half the pixel size)
    #[arg(short = 'm', long = "margin")]
    pub margin: Option<f32>,

    /// Text color (RRGGBB or RRGGBBAA)
    #[arg(long = "foreground", default_value = "000000")]
    pub foreground: String,

    /// Background color (RRGGBB or RRGGBBAA)
    #[arg(long = "background", default_value = "FFFFFF")]
    pub background: String,

    /// Extra directory to search for font families
    #[arg(long = "font-dir")]
    pub font_dirs: Vec<PathBuf>,

    /// Output PNG file, replaced if it exists
    #[arg(short = 'o', long = "output", default_value = "out.png")]
    pub output: PathBuf,

    /// Print one line per shaped glyph
    #[arg(long = "dump-glyphs")]
    pub dump_glyphs: bool,

    /// Print the glyph dump as JSON
    #[arg(long = "json", requires = "dump_glyphs")]
    pub json: bool,
}

/// Arguments for the variable command
#[derive(Parser, Debug)]
pub struct VariableArgs {
    /// Value for the `Weight` axis
    pub weight: Option<f32>,

    /// Value for the `Width` axis
    pub width: Option<f32>,

    /// Text to render
    pub text: Option<String>,

    /// Variable font file or family
    #[arg(short = 'f', long = "font", default_value = "./NotoSans-VariableFont_wdth,wght.ttf")]
    pub font: String,

    /// Output PNG file, replaced if it exists
    #[arg(short = 'o', long = "output", default_value = "out.png")]
    pub output: PathBuf,
}

/// Arguments for the glyphs command
#[derive(Parser, Debug)]
pub struct GlyphsArgs {
    /// Text to walk
    #[arg(default_value = "Hello, Text!")]
    pub text: String,

    /// Family name or font file path
    #[arg(short = 'f', long = "font", default_value = "sans-serif")]
    pub font: String,

    /// Size in typographic points
    #[arg(short = 'p', long = "points", default_value = "16")]
    pub points: f32,

    /// Device resolution
    #[arg(long = "dpi", default_value = "300")]
    pub dpi: f32,
}

/// Arguments for the axes command
#[derive(Parser, Debug)]
pub struct AxesArgs {
    /// Family name or font file path
    #[arg(short = 'f', long = "font", default_value = "sans-serif")]
    pub font: String,

    /// Extra directory to search for font families
    #[arg(long = "font-dir")]
    pub font_dirs: Vec<PathBuf>,
}

/// Arguments for the families command
#[derive(Parser, Debug)]
pub struct FamiliesArgs {
    /// Extra directory to search for font families
    #[arg(long = "font-dir")]
    pub font_dirs: Vec<PathBuf>,

    /// Only list fonts from --font-dir
    #[arg(long = "no-system")]
    pub no_system: bool,
}
