use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgb8;
use crate::foundation::error::{OgError, OgResult};
use crate::render::gradient::{ColorStop, LinearGradient};
use crate::render::photo::PhotoRegion;

pub const DEFAULT_TITLE: &str = "Allison Crank";

/// Brand gradient: #2c1e4a -> #d5825e -> #a99ab8 -> #96a1cd.
pub fn brand_stops() -> Vec<ColorStop> {
    vec![
        ColorStop::new(0.00, Rgb8::new(44, 30, 74)),
        ColorStop::new(0.42, Rgb8::new(213, 130, 94)),
        ColorStop::new(0.72, Rgb8::new(169, 154, 184)),
        ColorStop::new(1.00, Rgb8::new(150, 161, 205)),
    ]
}

/// Everything one render needs. Sizes and offsets are in output pixels; the pipeline multiplies
/// them by `oversample`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub oversample: u32,
    pub background: Rgb8,
    pub title: String,
    /// Title font. Missing or unreadable fonts fall back with a warning.
    pub font: Option<PathBuf>,
    /// Try a system face before the built-in font when falling back.
    pub system_fonts: bool,
    pub out: PathBuf,
    pub style: Style,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
            oversample: 3,
            background: Rgb8::new(10, 10, 12),
            title: DEFAULT_TITLE.to_owned(),
            font: Some(PathBuf::from("fonts").join("crankreg.ttf")),
            system_fonts: true,
            out: PathBuf::from("public").join("images").join("og.png"),
            style: Style::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Style {
    /// Centred title filled with a horizontal gradient.
    GradientTitle(GradientTitle),
    /// Headshot on the right, left-aligned title and captions.
    PhotoCaption(PhotoCaption),
}

impl Default for Style {
    fn default() -> Self {
        Self::GradientTitle(GradientTitle::default())
    }
}

impl Style {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GradientTitle(_) => "gradient-title",
            Self::PhotoCaption(_) => "photo-caption",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradientTitle {
    /// Target ink width of the title as a fraction of canvas width.
    pub width_fraction: f64,
    pub stops: Vec<ColorStop>,
}

impl Default for GradientTitle {
    fn default() -> Self {
        Self {
            width_fraction: 0.82,
            stops: brand_stops(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TitleFill {
    Gradient { stops: Vec<ColorStop> },
    Solid { color: Rgb8 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotoCaption {
    pub photo: PathBuf,
    /// Width of the left-edge fade into the background.
    pub fade_width: u32,
    pub veil_color: Rgb8,
    pub veil_opacity: u8,
    pub title_fill: TitleFill,
    /// Title ink width as a fraction of the text column.
    pub title_width_fraction: f64,
    /// Left margin shared by title and captions, also kept clear before the photo.
    pub margin: u32,
    /// Top of the title's ink box.
    pub title_top: u32,
    pub captions: Vec<String>,
    /// Caption font. Defaults to the title font.
    pub caption_font: Option<PathBuf>,
    /// Caption size as a fraction of canvas height. Lines too wide for the text column are
    /// shrunk to fit.
    pub caption_size: f64,
    pub caption_color: Rgb8,
    /// Distance between caption line tops, in multiples of the caption size.
    pub line_spacing: f64,
}

impl Default for PhotoCaption {
    fn default() -> Self {
        Self {
            photo: PathBuf::from("public").join("images").join("headshot.jpg"),
            fade_width: 280,
            veil_color: Rgb8::BLACK,
            veil_opacity: 72,
            title_fill: TitleFill::Gradient {
                stops: brand_stops(),
            },
            title_width_fraction: 0.9,
            margin: 72,
            title_top: 200,
            captions: vec![
                "Interaction designer & researcher".to_owned(),
                "Paris - Founder of Crank Studio".to_owned(),
            ],
            caption_font: None,
            caption_size: 0.045,
            caption_color: Rgb8::new(169, 154, 184),
            line_spacing: 1.6,
        }
    }
}

impl PhotoCaption {
    /// Width available to text on a `width × height` canvas: from the left margin to one margin
    /// short of the photo region.
    pub fn text_column_width(&self, width: u32, height: u32) -> u32 {
        PhotoRegion::right_aligned(width, height)
            .x
            .saturating_sub(self.margin.saturating_mul(2))
    }
}

impl RenderConfig {
    /// Defaults for the given style with every other field at its default.
    pub fn with_style(style: Style) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> OgResult<Self> {
        let f = File::open(path)
            .map_err(|e| OgError::io(format!("open config '{}': {e}", path.display())))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            OgError::validation(format!("parse config '{}': {e}", path.display()))
        })?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> OgResult<Self> {
        serde_json::from_str(s).map_err(|e| OgError::validation(format!("parse config: {e}")))
    }

    /// Resolve every relative path against `root`.
    pub fn resolved(mut self, root: &Path) -> Self {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        };
        if let Some(font) = self.font.as_mut() {
            join(font);
        }
        join(&mut self.out);
        if let Style::PhotoCaption(pc) = &mut self.style {
            join(&mut pc.photo);
            if let Some(font) = pc.caption_font.as_mut() {
                join(font);
            }
        }
        self
    }

    pub fn validate(&self) -> OgResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OgError::validation("output width/height must be > 0"));
        }
        if !(1..=8).contains(&self.oversample) {
            return Err(OgError::validation(format!(
                "oversample must be in 1..=8 (got {})",
                self.oversample
            )));
        }
        if self.title.trim().is_empty() {
            return Err(OgError::validation("title must not be empty"));
        }
        if self.out.as_os_str().is_empty() {
            return Err(OgError::validation("output path must not be empty"));
        }

        match &self.style {
            Style::GradientTitle(gt) => {
                validate_fraction("width_fraction", gt.width_fraction)?;
                LinearGradient::new(gt.stops.clone())?;
            }
            Style::PhotoCaption(pc) => {
                validate_fraction("title_width_fraction", pc.title_width_fraction)?;
                if let TitleFill::Gradient { stops } = &pc.title_fill {
                    LinearGradient::new(stops.clone())?;
                }
                let side = self.width.min(self.height);
                if pc.fade_width > side {
                    return Err(OgError::validation(format!(
                        "fade_width {} exceeds photo region size {side}",
                        pc.fade_width
                    )));
                }
                if pc.margin >= self.width || pc.title_top >= self.height {
                    return Err(OgError::validation(
                        "title margin/top must lie inside the canvas",
                    ));
                }
                if pc.text_column_width(self.width, self.height) == 0 {
                    return Err(OgError::validation(format!(
                        "margin {} leaves no room for text left of the photo",
                        pc.margin
                    )));
                }
                if !(pc.caption_size.is_finite() && pc.caption_size > 0.0 && pc.caption_size <= 1.0)
                {
                    return Err(OgError::validation(format!(
                        "caption_size must be in (0, 1] (got {})",
                        pc.caption_size
                    )));
                }
                if !(pc.line_spacing.is_finite() && pc.line_spacing > 0.0) {
                    return Err(OgError::validation(format!(
                        "line_spacing must be > 0 (got {})",
                        pc.line_spacing
                    )));
                }
            }
        }
        Ok(())
    }
}

fn validate_fraction(name: &str, v: f64) -> OgResult<()> {
    if !(v > 0.0 && v <= 1.0) {
        return Err(OgError::validation(format!(
            "{name} must be in (0, 1] (got {v})"
        )));
    }
    Ok(())
}
