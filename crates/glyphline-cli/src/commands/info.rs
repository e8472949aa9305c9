//! Commands that inspect fonts instead of rendering

use glyphline::error::Result;
use glyphline::fontdb::{FontHandle, FontLoader, FontResolver};
use glyphline::traits::FontRef;
use glyphline::{walk_chars, PipelineOptions, SizeSpec, DEFAULT_WALK_ORIGIN};

use crate::cli::{AxesArgs, FamiliesArgs, GlyphsArgs};

fn load(options: &PipelineOptions) -> Result<FontHandle> {
    let resolved = options.resolver().resolve(&options.font)?;
    if resolved.substituted {
        println!(
            "Using {} for '{}'",
            resolved.family.as_deref().unwrap_or("?"),
            options.font
        );
    }
    FontLoader::new().load_resolved(&resolved, options.size, &options.axes)
}

pub fn run_glyphs(args: &GlyphsArgs) -> Result<()> {
    let options = PipelineOptions {
        font: args.font.clone(),
        size: SizeSpec::Points {
            points: args.points,
            dpi: args.dpi,
        },
        ..PipelineOptions::default()
    };
    let font = load(&options)?;

    println!("{}", args.text);
    for placement in walk_chars(&args.text, &font, DEFAULT_WALK_ORIGIN) {
        println!("char: {}({}, {})", placement.ch, placement.x, placement.y);
        log::debug!("'{}' -> glyph {}", placement.ch, placement.glyph_id);
    }
    Ok(())
}

pub fn run_axes(args: &AxesArgs) -> Result<()> {
    let options = PipelineOptions {
        font: args.font.clone(),
        font_dirs: args.font_dirs.clone(),
        ..PipelineOptions::default()
    };
    let font = load(&options)?;

    let family = font.family_name().unwrap_or_else(|| font.path().display().to_string());
    if !font.is_variable() {
        println!("{}: no variation axes", family);
        return Ok(());
    }

    println!("{}: {} axes", family, font.axes().len());
    for axis in font.axes() {
        println!(
            "  {}  {:<12} min {:>8.2}  default {:>8.2}  max {:>8.2}",
            axis.tag, axis.name, axis.min, axis.default, axis.max
        );
    }
    log::debug!("{} units per em", font.units_per_em());
    Ok(())
}

pub fn run_families(args: &FamiliesArgs) -> Result<()> {
    let mut resolver = if args.no_system {
        FontResolver::empty()
    } else {
        FontResolver::system()
    };
    for dir in &args.font_dirs {
        resolver.add_font_dir(dir);
    }

    let families = resolver.families();
    log::info!("{} faces, {} families", resolver.database().len(), families.len());
    for family in families {
        println!("{}", family);
    }
    Ok(())
}
