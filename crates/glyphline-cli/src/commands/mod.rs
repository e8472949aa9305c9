//! What each subcommand does

pub mod info;
pub mod render;

use glyphline::error::{GlyphlineError, Result};
use glyphline::types::{AxisRequest, Direction};
use glyphline::Color;

use crate::cli::Commands;

pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render(args) => render::run_render(&args),
        Commands::Variable(args) => render::run_variable(&args),
        Commands::Glyphs(args) => info::run_glyphs(&args),
        Commands::Axes(args) => info::run_axes(&args),
        Commands::Families(args) => info::run_families(&args),
    }
}

/// `None` for `auto`
pub(crate) fn parse_direction(dir_str: &str) -> Result<Option<Direction>> {
    match dir_str {
        "auto" => Ok(None),
        "ltr" => Ok(Some(Direction::LeftToRight)),
        "rtl" => Ok(Some(Direction::RightToLeft)),
        "ttb" => Ok(Some(Direction::TopToBottom)),
        "btt" => Ok(Some(Direction::BottomToTop)),
        _ => Err(GlyphlineError::Config(format!("Invalid direction: {}", dir_str))),
    }
}

pub(crate) fn parse_color(color_str: &str) -> Result<Color> {
    Color::from_hex(color_str).ok_or_else(|| {
        GlyphlineError::Config(format!(
            "Color must be in RRGGBB or RRGGBBAA format, got '{}'",
            color_str
        ))
    })
}

pub(crate) fn parse_features(features_str: Option<&str>) -> Result<Vec<(String, u32)>> {
    let Some(features) = features_str else {
        return Ok(Vec::new());
    };

    let mut result = Vec::new();
    for part in features.split([',', ' ']) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (tag, value) = if let Some(tag) = part.strip_prefix('+') {
            (tag, 1)
        } else if let Some(tag) = part.strip_prefix('-') {
            (tag, 0)
        } else if let Some((tag, val)) = part.split_once('=') {
            let val = val
                .parse()
                .map_err(|_| GlyphlineError::Config(format!("Invalid feature value: {}", part)))?;
            (tag, val)
        } else {
            (part, 1)
        };

        result.push((tag.to_string(), value));
    }

    Ok(result)
}

/// `Weight=700`, `wdth=75.5`
pub(crate) fn parse_axis(axis_str: &str) -> Result<AxisRequest> {
    let invalid = || GlyphlineError::Config(format!("Axis must be NAME=VALUE, got '{}'", axis_str));

    let (name, value) = axis_str.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    let value: f32 = value.trim().parse().map_err(|_| invalid())?;
    Ok(AxisRequest::new(name, value))
}
