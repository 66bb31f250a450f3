use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::foundation::error::{OgError, OgResult};

/// Public-domain Tuffy Regular, always available as the last fallback.
const BUILTIN_FONT: &[u8] = include_bytes!("../../assets/fonts/Tuffy.ttf");

/// Glyph coverage bitmap positioned relative to the pen on the baseline (y grows downward, so
/// `top` is usually negative).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterGlyph {
    pub left: i32,
    pub top: i32,
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

impl RasterGlyph {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Where a [`FontHandle`] came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    File(PathBuf),
    System(String),
    Builtin,
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(p) => write!(f, "file '{}'", p.display()),
            Self::System(family) => write!(f, "system font '{family}'"),
            Self::Builtin => f.write_str("built-in font 'Tuffy'"),
        }
    }
}

/// Read-only outline font used by the text mask renderer.
pub struct FontHandle {
    font: fontdue::Font,
    source: FontSource,
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl FontHandle {
    /// The face compiled into the binary.
    pub fn builtin() -> OgResult<Self> {
        Self::from_bytes(BUILTIN_FONT, FontSource::Builtin)
    }

    pub fn from_bytes(bytes: &[u8], source: FontSource) -> OgResult<Self> {
        let font = parse_outline(bytes, 0)?;
        Ok(Self { font, source })
    }

    pub fn from_file(path: &Path) -> OgResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| OgError::font(format!("read '{}': {e}", path.display())))?;
        Self::from_bytes(&bytes, FontSource::File(path.to_path_buf()))
    }

    /// First sans-serif (then serif, then any) face known to the system font database.
    pub fn system_fallback() -> OgResult<Self> {
        use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

        let mut db = Database::new();
        db.load_system_fonts();

        let query = Query {
            families: &[Family::SansSerif, Family::Serif],
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|f| f.id))
            .ok_or_else(|| OgError::font("no system fonts available"))?;

        let family = db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "unknown".to_owned());

        let font = db
            .with_face_data(id, |data, index| parse_outline(data, index))
            .ok_or_else(|| OgError::font(format!("system font '{family}' has no data")))??;

        Ok(Self {
            font,
            source: FontSource::System(family),
        })
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    /// Distance from the line top to the baseline at `px`.
    pub fn ascent(&self, px: f32) -> f32 {
        self.font
            .horizontal_line_metrics(px)
            .map(|m| m.ascent)
            .unwrap_or(px * 0.8)
    }

    pub fn advance(&self, ch: char, px: f32) -> f32 {
        self.font.metrics(ch, px).advance_width
    }

    pub fn kern(&self, left: char, right: char, px: f32) -> f32 {
        self.font.horizontal_kern(left, right, px).unwrap_or(0.0)
    }

    pub fn rasterize(&self, ch: char, px: f32) -> RasterGlyph {
        let (m, coverage) = self.font.rasterize(ch, px);
        RasterGlyph {
            left: m.xmin,
            // fontdue measures ymin upward from the baseline.
            top: -(m.ymin + m.height as i32),
            width: m.width,
            height: m.height,
            coverage,
        }
    }
}

fn parse_outline(bytes: &[u8], collection_index: u32) -> OgResult<fontdue::Font> {
    let settings = fontdue::FontSettings {
        collection_index,
        ..fontdue::FontSettings::default()
    };
    fontdue::Font::from_bytes(bytes, settings).map_err(|e| OgError::font(e.to_string()))
}

/// A font together with the reason the requested one was not used, if any.
#[derive(Debug)]
pub struct LoadedFont {
    pub font: FontHandle,
    pub fallback_reason: Option<String>,
}

/// Resolve a font with graceful degradation: the requested file, then a system face (when
/// `system_fallback` is set), then the built-in face. Only fails if the built-in face itself
/// cannot be parsed.
pub fn load_font_or_fallback(
    path: Option<&Path>,
    system_fallback: bool,
) -> OgResult<LoadedFont> {
    let mut fallback_reason = None;

    if let Some(path) = path {
        match FontHandle::from_file(path) {
            Ok(font) => {
                tracing::debug!(path = %path.display(), "loaded font");
                return Ok(LoadedFont {
                    font,
                    fallback_reason: None,
                });
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    "font unavailable ({err}); falling back to default font"
                );
                fallback_reason = Some(err.to_string());
            }
        }
    }

    if system_fallback {
        match FontHandle::system_fallback() {
            Ok(font) => {
                tracing::debug!(source = %font.source(), "using fallback font");
                return Ok(LoadedFont {
                    font,
                    fallback_reason,
                });
            }
            Err(err) => tracing::debug!("system font fallback failed: {err}"),
        }
    }

    tracing::debug!("using built-in font");
    Ok(LoadedFont {
        font: FontHandle::builtin()?,
        fallback_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_font_error() {
        let err = FontHandle::from_file(Path::new("does/not/exist.ttf")).unwrap_err();
        assert!(matches!(err, OgError::Font(_)));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = FontHandle::from_bytes(b"not a font", FontSource::Builtin).unwrap_err();
        assert!(err.to_string().contains("font error:"));
    }

    #[test]
    fn builtin_face_parses() {
        let font = FontHandle::builtin().unwrap();
        assert_eq!(font.source(), &FontSource::Builtin);
        assert!(font.advance('A', 100.0) > 0.0);
    }

    #[test]
    fn ascent_scales_with_size() {
        let font = FontHandle::builtin().unwrap();
        let a100 = font.ascent(100.0);
        let a200 = font.ascent(200.0);
        assert!(a100 > 50.0 && a100 < 120.0, "ascent {a100}");
        assert!((a200 - 2.0 * a100).abs() < 0.01);
    }

    #[test]
    fn glyph_bitmaps_hang_from_the_baseline() {
        let font = FontHandle::builtin().unwrap();

        // 'H' sits on the baseline and rises above it.
        let h = font.rasterize('H', 100.0);
        assert!(h.top < 0);
        assert!((h.top + h.height as i32).abs() <= 1, "{} + {}", h.top, h.height);
        assert!(h.left >= 0);
        assert_eq!(h.coverage.len(), h.width * h.height);
        assert!(h.coverage.contains(&255));

        // 'p' has a descender below it.
        let p = font.rasterize('p', 100.0);
        assert!(p.top + p.height as i32 > 10);

        assert!(font.rasterize(' ', 100.0).is_empty());
    }

    #[test]
    fn kerning_never_widens_av() {
        let font = FontHandle::builtin().unwrap();
        assert!(font.kern('A', 'V', 100.0) <= 0.0);
    }

    #[test]
    fn fallback_without_system_fonts_is_builtin() {
        let missing = Path::new("does/not/exist.ttf");
        let loaded = load_font_or_fallback(Some(missing), false).unwrap();
        assert_eq!(loaded.font.source(), &FontSource::Builtin);
        assert!(loaded.fallback_reason.is_some());
    }

    #[test]
    fn no_request_means_no_fallback_reason() {
        let loaded = load_font_or_fallback(None, false).unwrap();
        assert_eq!(loaded.font.source(), &FontSource::Builtin);
        assert!(loaded.fallback_reason.is_none());
    }

    #[test]
    fn source_display_is_readable() {
        assert_eq!(FontSource::Builtin.to_string(), "built-in font 'Tuffy'");
        assert_eq!(
            FontSource::System("DejaVu Sans".into()).to_string(),
            "system font 'DejaVu Sans'"
        );
    }
}
