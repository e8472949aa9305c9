// this_file: crates/glyphline-fontdb/src/resolver.rs

//! Family names and paths in, font files out
//!
//! Matching itself belongs to `fontdb`. This module decides whether a name
//! is a path or a family, maps generic families onto installed ones, and
//! refuses to hand back anything that was not asked for.

use std::path::{Path, PathBuf};

use fontdb::{Database, Family, Query, Source};
use glyphline_core::{
    error::{FontNotFoundError, Result},
    types::ResolvedFont,
    PipelineContext, Stage,
};

/// Extra font directories, separated like `PATH`
pub const FONT_DIRS_ENV: &str = "GLYPHLINE_FONT_DIRS";

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc", "woff", "woff2"];

/// CSS-style generic families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericFamily {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl GenericFamily {
    /// Case-insensitive; anything else is a concrete family name
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "serif" => Some(Self::Serif),
            "sans-serif" | "sans" => Some(Self::SansSerif),
            "monospace" | "mono" => Some(Self::Monospace),
            "cursive" => Some(Self::Cursive),
            "fantasy" => Some(Self::Fantasy),
            _ => None,
        }
    }

    pub fn to_fontdb(self) -> Family<'static> {
        match self {
            Self::Serif => Family::Serif,
            Self::SansSerif => Family::SansSerif,
            Self::Monospace => Family::Monospace,
            Self::Cursive => Family::Cursive,
            Self::Fantasy => Family::Fantasy,
        }
    }

    /// Installed families commonly standing in for this generic, in order of preference
    pub fn fallback_families(self) -> &'static [&'static str] {
        match self {
            Self::Serif => &[
                "Times New Roman",
                "DejaVu Serif",
                "Liberation Serif",
                "Noto Serif",
                "FreeSerif",
            ],
            Self::SansSerif => &[
                "Arial",
                "Helvetica",
                "DejaVu Sans",
                "Liberation Sans",
                "Noto Sans",
                "FreeSans",
                "Roboto",
            ],
            Self::Monospace => &[
                "Courier New",
                "DejaVu Sans Mono",
                "Liberation Mono",
                "Noto Sans Mono",
                "FreeMono",
            ],
            Self::Cursive => &["Comic Sans MS", "Apple Chancery", "URW Chancery L"],
            Self::Fantasy => &["Impact", "Papyrus", "Luminari"],
        }
    }
}

/// Finds font files by family name or path
pub struct FontResolver {
    db: Database,
}

impl FontResolver {
    /// Installed fonts, plus any directories listed in `GLYPHLINE_FONT_DIRS`
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        let mut resolver = Self { db };

        if let Some(dirs) = std::env::var_os(FONT_DIRS_ENV) {
            for dir in std::env::split_paths(&dirs) {
                resolver.add_font_dir(dir);
            }
        }

        log::debug!("Font database holds {} faces", resolver.db.len());
        resolver
    }

    /// No fonts at all; paths still pass through
    pub fn empty() -> Self {
        Self {
            db: Database::new(),
        }
    }

    /// Scan a directory recursively; a leading `~` is expanded
    pub fn add_font_dir(&mut self, dir: impl AsRef<Path>) {
        let dir = expand_home(dir.as_ref());
        let before = self.db.len();
        self.db.load_fonts_dir(&dir);
        log::debug!(
            "Loaded {} faces from {}",
            self.db.len() - before,
            dir.display()
        );
    }

    /// Register a single font file
    pub fn add_font_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = expand_home(path.as_ref());
        self.db.load_font_file(&path)?;
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Every family name the database knows, sorted and deduplicated
    pub fn families(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .db
            .faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Turn a family name or a path into a font file
    ///
    /// Existing files and path-looking specs are taken as paths. Generic
    /// families are substituted; concrete families must match exactly.
    pub fn resolve(&self, spec: &str) -> Result<ResolvedFont> {
        let expanded = expand_home(Path::new(spec));
        if expanded.is_file() {
            log::debug!("Using font file {}", expanded.display());
            return Ok(ResolvedFont::from_path(expanded));
        }
        if looks_like_path(spec) {
            return Err(FontNotFoundError::Path(expanded).into());
        }

        match GenericFamily::parse(spec) {
            Some(generic) => self.resolve_generic(spec, generic),
            None => self
                .query(Family::Name(spec))
                .ok_or_else(|| FontNotFoundError::Family(spec.to_string()))?,
        }
    }

    fn resolve_generic(&self, spec: &str, generic: GenericFamily) -> Result<ResolvedFont> {
        let candidates = std::iter::once(generic.to_fontdb())
            .chain(generic.fallback_families().iter().map(|name| Family::Name(*name)));

        for family in candidates {
            if let Some(found) = self.query(family) {
                let mut found = found?;
                found.substituted = true;
                log::info!(
                    "Generic family '{}' substituted with '{}'",
                    spec,
                    found.family.as_deref().unwrap_or("?")
                );
                return Ok(found);
            }
        }

        Err(FontNotFoundError::Family(spec.to_string()).into())
    }

    /// `None` when nothing matches; `Some(Err)` when the match has no file behind it
    fn query(&self, family: Family<'_>) -> Option<Result<ResolvedFont>> {
        let families = [family];
        let query = Query {
            families: &families,
            ..Query::default()
        };
        let id = self.db.query(&query)?;
        let face = self.db.face(id)?;
        let family_name = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();

        let path = match &face.source {
            Source::File(path) | Source::SharedFile(path, _) => path.clone(),
            Source::Binary(_) => {
                return Some(Err(FontNotFoundError::NoFileSource(family_name).into()))
            },
        };

        log::debug!(
            "Resolved '{}' to {} (face {})",
            family_name,
            path.display(),
            face.index
        );
        Some(Ok(ResolvedFont {
            path,
            face_index: face.index,
            family: Some(family_name),
            substituted: false,
        }))
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::system()
    }
}

impl Stage for FontResolver {
    fn name(&self) -> &'static str {
        "FontResolution"
    }

    fn process(&self, context: &mut PipelineContext) -> Result<()> {
        let resolved = self.resolve(context.font_spec())?;
        context.set_resolved(resolved);
        Ok(())
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}

/// Separators, a leading `~` or `.`, or a font file extension
fn looks_like_path(spec: &str) -> bool {
    if spec.contains('/') || spec.contains('\\') || spec.starts_with('~') || spec.starts_with('.')
    {
        return true;
    }
    Path::new(spec)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FONT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}
