use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use image::{
    RgbImage,
    codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder},
};

use crate::config::{GradientTitle, PhotoCaption, RenderConfig, Style, TitleFill};
use crate::foundation::error::{OgError, OgResult};
use crate::text::font::{FontSource, LoadedFont, load_font_or_fallback};
use crate::text::layout::{Placement, TextMask, TextSize, render_text_mask};

use super::canvas::Canvas;
use super::composite::{composite_masked, composite_solid_masked, downsample};
use super::gradient::LinearGradient;
use super::photo::{PhotoParams, PhotoRegion, Veil, composite_photo, load_photo};

/// Which font ended up drawing a piece of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontUse {
    pub role: &'static str,
    pub source: FontSource,
    /// Why the requested font was not used, when it was not.
    pub fallback_reason: Option<String>,
}

impl FontUse {
    fn new(role: &'static str, loaded: &LoadedFont) -> Self {
        Self {
            role,
            source: loaded.font.source().clone(),
            fallback_reason: loaded.fallback_reason.clone(),
        }
    }
}

/// In-memory result of a render.
#[derive(Clone, Debug)]
pub struct Rendered {
    pub image: RgbImage,
    pub fonts: Vec<FontUse>,
}

/// Outcome of [`render_to_file`].
#[derive(Clone, Debug)]
pub struct RenderReport {
    pub out_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub style: &'static str,
    pub fonts: Vec<FontUse>,
}

impl RenderReport {
    pub fn used_fallback(&self) -> bool {
        self.fonts.iter().any(|f| f.fallback_reason.is_some())
    }
}

/// Render `config` to an output-sized image. Paths in `config` are used as given; call
/// [`RenderConfig::resolved`] first to anchor them to a project root.
#[tracing::instrument(skip(config), fields(style = config.style.name()))]
pub fn render(config: &RenderConfig) -> OgResult<Rendered> {
    config.validate()?;

    let output = Canvas::new(config.width, config.height)?;
    let work = output.scaled(config.oversample)?;
    tracing::debug!(
        width = work.width,
        height = work.height,
        oversample = config.oversample,
        "allocating canvas"
    );
    let mut canvas = work.fill(config.background);

    let title_font = load_font_or_fallback(config.font.as_deref(), config.system_fonts)?;
    let mut fonts = vec![FontUse::new("title", &title_font)];

    match &config.style {
        Style::GradientTitle(gt) => {
            render_gradient_title(&mut canvas, work, config, gt, &title_font)?;
        }
        Style::PhotoCaption(pc) => {
            let caption_font =
                render_photo_caption(&mut canvas, work, config, pc, &title_font)?;
            if let Some(cf) = caption_font {
                fonts.push(FontUse::new("caption", &cf));
            }
        }
    }

    let image = downsample(&canvas, output.width, output.height);
    Ok(Rendered { image, fonts })
}

fn render_gradient_title(
    canvas: &mut RgbImage,
    work: Canvas,
    config: &RenderConfig,
    gt: &GradientTitle,
    font: &LoadedFont,
) -> OgResult<()> {
    let text = render_text_mask(
        &font.font,
        &config.title,
        work.width,
        work.height,
        TextSize::FitWidth {
            fraction: gt.width_fraction,
        },
        Placement::Centered,
    )?;

    let gradient = LinearGradient::new(gt.stops.clone())?.render(work.width, work.height);
    composite_masked(canvas, &gradient, &text.mask)
}

/// Returns the caption font when it differs from the title font.
fn render_photo_caption(
    canvas: &mut RgbImage,
    work: Canvas,
    config: &RenderConfig,
    pc: &PhotoCaption,
    title_font: &LoadedFont,
) -> OgResult<Option<LoadedFont>> {
    let k = config.oversample;

    let photo = load_photo(&pc.photo)?;
    composite_photo(
        canvas,
        &photo,
        PhotoParams {
            region: PhotoRegion::right_aligned(work.width, work.height),
            background: config.background,
            fade_width: pc.fade_width * k,
            veil: Veil {
                color: pc.veil_color,
                opacity: pc.veil_opacity,
            },
        },
    )?;

    let margin = i64::from(pc.margin * k);
    let column = pc.text_column_width(config.width, config.height) * k;
    let title = render_text_mask(
        &title_font.font,
        &config.title,
        work.width,
        work.height,
        TextSize::FitWidth {
            fraction: pc.title_width_fraction * f64::from(column) / f64::from(work.width),
        },
        Placement::Left {
            margin,
            top: i64::from(pc.title_top * k),
        },
    )?;
    fill_text(canvas, work, &title, &pc.title_fill)?;

    let captions: Vec<&str> = pc
        .captions
        .iter()
        .map(String::as_str)
        .filter(|c| !c.trim().is_empty())
        .collect();
    if captions.is_empty() {
        return Ok(None);
    }

    let own_font = pc
        .caption_font
        .as_deref()
        .map(|p| load_font_or_fallback(Some(p), config.system_fonts))
        .transpose()?;
    let caption_font = own_font.as_ref().unwrap_or(title_font);

    let px = (pc.caption_size * f64::from(work.height)) as f32;
    let step = (f64::from(px) * pc.line_spacing).round() as i64;
    let mut top = title.ink.y1 + i64::from(px.round() as i32);
    for line in captions {
        let mask = render_text_mask(
            &caption_font.font,
            line,
            work.width,
            work.height,
            TextSize::AtMost {
                px,
                max_width: column,
            },
            Placement::Line { margin, top },
        )?;
        composite_solid_masked(canvas, pc.caption_color, &mask.mask)?;
        top += step;
    }

    Ok(own_font)
}

fn fill_text(
    canvas: &mut RgbImage,
    work: Canvas,
    text: &TextMask,
    fill: &TitleFill,
) -> OgResult<()> {
    match fill {
        TitleFill::Gradient { stops } => {
            let gradient = LinearGradient::new(stops.clone())?.render(work.width, work.height);
            composite_masked(canvas, &gradient, &text.mask)
        }
        TitleFill::Solid { color } => composite_solid_masked(canvas, *color, &text.mask),
    }
}

/// Write `img` as a best-compression PNG, creating parent directories.
pub fn save_png(img: &RgbImage, path: &Path) -> OgResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            OgError::io(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    let file = File::create(path)
        .map_err(|e| OgError::io(format!("create '{}': {e}", path.display())))?;
    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        CompressionType::Best,
        PngFilter::Adaptive,
    );
    img.write_with_encoder(encoder)
        .map_err(|e| OgError::image(format!("write png '{}': {e}", path.display())))
}

/// Render and save to `config.out`.
pub fn render_to_file(config: &RenderConfig) -> OgResult<RenderReport> {
    let rendered = render(config)?;
    save_png(&rendered.image, &config.out)?;
    tracing::info!(path = %config.out.display(), "saved image");

    let (width, height) = rendered.image.dimensions();
    Ok(RenderReport {
        out_path: config.out.clone(),
        width,
        height,
        style: config.style.name(),
        fonts: rendered.fonts,
    })
}
