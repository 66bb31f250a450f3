use image::GrayImage;

use crate::foundation::error::{OgError, OgResult};
use crate::foundation::math::floor_div;

use super::font::{FontHandle, RasterGlyph};

/// Initial guess for fit-to-width sizing, as a fraction of canvas height.
pub const INITIAL_SIZE_FRACTION: f64 = 0.55;

/// Tight box around the rendered coverage of a line, relative to its pen origin (the top-left
/// of the line box). `x1`/`y1` are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InkBox {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl InkBox {
    pub fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i64 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn translate(self, dx: i64, dy: i64) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }
}

#[derive(Clone, Debug)]
struct PlacedGlyph {
    x: i64,
    y: i64,
    glyph: RasterGlyph,
}

/// A single line of glyphs laid out at one pixel size.
#[derive(Clone, Debug)]
pub struct LineLayout {
    px: f32,
    glyphs: Vec<PlacedGlyph>,
    ink: InkBox,
}

impl LineLayout {
    pub fn new(font: &FontHandle, text: &str, px: f32) -> Self {
        let baseline = font.ascent(px).round() as i64;
        let mut pen = 0.0f32;
        let mut prev: Option<char> = None;
        let mut glyphs = Vec::new();
        let mut ink: Option<InkBox> = None;

        for ch in text.chars() {
            if let Some(p) = prev {
                pen += font.kern(p, ch, px);
            }
            let glyph = font.rasterize(ch, px);
            if !glyph.is_empty() {
                let x = pen.round() as i64 + i64::from(glyph.left);
                let y = baseline + i64::from(glyph.top);
                let b = InkBox {
                    x0: x,
                    y0: y,
                    x1: x + glyph.width as i64,
                    y1: y + glyph.height as i64,
                };
                ink = Some(match ink {
                    None => b,
                    Some(a) => InkBox {
                        x0: a.x0.min(b.x0),
                        y0: a.y0.min(b.y0),
                        x1: a.x1.max(b.x1),
                        y1: a.y1.max(b.y1),
                    },
                });
                glyphs.push(PlacedGlyph { x, y, glyph });
            }
            pen += font.advance(ch, px);
            prev = Some(ch);
        }

        Self {
            px,
            glyphs,
            ink: ink.unwrap_or_default(),
        }
    }

    pub fn px(&self) -> f32 {
        self.px
    }

    pub fn ink(&self) -> InkBox {
        self.ink
    }

    /// Stamp coverage into `mask` with the line origin at `(ox, oy)`. Overlapping glyphs keep
    /// the larger coverage; anything outside the mask is clipped.
    pub fn draw(&self, mask: &mut GrayImage, ox: i64, oy: i64) {
        let (mw, mh) = (i64::from(mask.width()), i64::from(mask.height()));
        for pg in &self.glyphs {
            let g = &pg.glyph;
            for gy in 0..g.height {
                let y = oy + pg.y + gy as i64;
                if y < 0 || y >= mh {
                    continue;
                }
                for gx in 0..g.width {
                    let x = ox + pg.x + gx as i64;
                    if x < 0 || x >= mw {
                        continue;
                    }
                    let c = g.coverage[gy * g.width + gx];
                    if c == 0 {
                        continue;
                    }
                    let px = mask.get_pixel_mut(x as u32, y as u32);
                    px.0[0] = px.0[0].max(c);
                }
            }
        }
    }
}

/// How the pixel size of a line is chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextSize {
    /// Scale so the ink width is `fraction × canvas_width`.
    FitWidth { fraction: f64 },
    /// Fixed pixel size.
    Fixed { px: f32 },
    /// `px`, shrunk to whole pixels when the ink would be wider than `max_width`.
    AtMost { px: f32, max_width: u32 },
}

/// Where a line lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Ink box centred on the canvas.
    Centered,
    /// Ink box top-left at `(margin, top)`.
    Left { margin: i64, top: i64 },
    /// Ink box left edge at `margin`, line box top at `top`. Keeps a steady rhythm between
    /// stacked lines regardless of which glyphs they contain.
    Line { margin: i64, top: i64 },
}

/// Coverage mask for one line of text plus the geometry used to produce it.
#[derive(Clone, Debug)]
pub struct TextMask {
    pub mask: GrayImage,
    pub px: f32,
    /// Line origin on the canvas.
    pub origin: (i64, i64),
    /// Ink box in canvas coordinates.
    pub ink: InkBox,
}

/// Fit-to-width font size: lay out at an initial guess, then rescale proportionally so the ink
/// width matches `fraction × canvas_width`. The result is a whole number of pixels, so the ink
/// may fall short of the target by up to one pixel size step.
pub fn fit_font_size(
    font: &FontHandle,
    text: &str,
    canvas_width: u32,
    canvas_height: u32,
    fraction: f64,
) -> OgResult<f32> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(OgError::validation(format!(
            "text width fraction must be in (0, 1] (got {fraction})"
        )));
    }

    let guess = (f64::from(canvas_height) * INITIAL_SIZE_FRACTION).floor().max(1.0);
    let probe = LineLayout::new(font, text, guess as f32);
    let ink_w = probe.ink().width();
    if ink_w <= 0 {
        return Err(OgError::validation(format!(
            "text {text:?} has no visible glyphs"
        )));
    }

    // Whole pixel sizes only, rounded down like the first guess.
    let target_w = f64::from(canvas_width) * fraction;
    let px = (guess * target_w / ink_w as f64).floor().max(1.0);
    Ok(px as f32)
}

fn checked_px(px: f32) -> OgResult<f32> {
    if !(px.is_finite() && px > 0.0) {
        return Err(OgError::validation(format!(
            "font size must be positive (got {px})"
        )));
    }
    Ok(px)
}

/// Rasterize `text` into a canvas-sized coverage mask.
pub fn render_text_mask(
    font: &FontHandle,
    text: &str,
    width: u32,
    height: u32,
    size: TextSize,
    placement: Placement,
) -> OgResult<TextMask> {
    let px = match size {
        TextSize::FitWidth { fraction } => fit_font_size(font, text, width, height, fraction)?,
        TextSize::Fixed { px } => checked_px(px)?,
        TextSize::AtMost { px, max_width } => {
            let px = checked_px(px)?;
            let ink_w = LineLayout::new(font, text, px).ink().width();
            if ink_w > i64::from(max_width) {
                (f64::from(px) * f64::from(max_width) / ink_w as f64).floor().max(1.0) as f32
            } else {
                px
            }
        }
    };

    let line = LineLayout::new(font, text, px);
    let ink = line.ink();

    let origin = match placement {
        Placement::Centered => (
            floor_div(i64::from(width) - ink.width(), 2) - ink.x0,
            floor_div(i64::from(height) - ink.height(), 2) - ink.y0,
        ),
        Placement::Left { margin, top } => (margin - ink.x0, top - ink.y0),
        Placement::Line { margin, top } => (margin - ink.x0, top),
    };

    let mut mask = GrayImage::new(width, height);
    line.draw(&mut mask, origin.0, origin.1);

    tracing::debug!(
        text,
        px,
        origin_x = origin.0,
        origin_y = origin.1,
        ink_w = ink.width(),
        ink_h = ink.height(),
        "rendered text mask"
    );

    Ok(TextMask {
        mask,
        px,
        origin,
        ink: ink.translate(origin.0, origin.1),
    })
}
