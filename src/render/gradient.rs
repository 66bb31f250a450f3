use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgb8;
use crate::foundation::error::{OgError, OgResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub pos: f64,
    pub color: Rgb8,
}

impl ColorStop {
    pub const fn new(pos: f64, color: Rgb8) -> Self {
        Self { pos, color }
    }
}

/// Horizontal piecewise-linear gradient over `[0, 1]`.
///
/// Stops are validated on construction: at least two, positions finite and non-decreasing,
/// first at 0 and last at 1. Repeated positions are allowed and produce a hard edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(stops: Vec<ColorStop>) -> OgResult<Self> {
        validate_stops(&stops)?;
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Colour at `t`. The first segment whose closed range contains `t` wins, and each channel
    /// is truncated toward zero after interpolation.
    pub fn eval(&self, t: f64) -> Rgb8 {
        let t = t.clamp(0.0, 1.0);
        for pair in self.stops.windows(2) {
            let (s0, s1) = (pair[0], pair[1]);
            if s0.pos <= t && t <= s1.pos {
                let span = s1.pos - s0.pos;
                let f = if span > 0.0 { (t - s0.pos) / span } else { 0.0 };
                return Rgb8::new(
                    lerp_trunc(s0.color.r, s1.color.r, f),
                    lerp_trunc(s0.color.g, s1.color.g, f),
                    lerp_trunc(s0.color.b, s1.color.b, f),
                );
            }
        }
        // Unreachable for validated stops; keep the last colour rather than panic.
        self.stops[self.stops.len() - 1].color
    }

    /// One colour per column, `t = x / (width - 1)`.
    pub fn column_colors(&self, width: u32) -> Vec<Rgb8> {
        let denom = width.saturating_sub(1);
        (0..width)
            .map(|x| {
                let t = if denom == 0 {
                    0.0
                } else {
                    f64::from(x) / f64::from(denom)
                };
                self.eval(t)
            })
            .collect()
    }

    /// Full `width × height` image; every column is uniform.
    pub fn render(&self, width: u32, height: u32) -> RgbImage {
        let columns = self.column_colors(width);
        RgbImage::from_fn(width, height, |x, _| columns[x as usize].to_pixel())
    }
}

fn lerp_trunc(a: u8, b: u8, f: f64) -> u8 {
    let a = f64::from(a);
    let b = f64::from(b);
    (a + f * (b - a)) as u8
}

fn validate_stops(stops: &[ColorStop]) -> OgResult<()> {
    if stops.len() < 2 {
        return Err(OgError::validation("gradient needs at least two color stops"));
    }
    if stops.iter().any(|s| !s.pos.is_finite()) {
        return Err(OgError::validation("gradient stop positions must be finite"));
    }
    if stops[0].pos != 0.0 {
        return Err(OgError::validation(format!(
            "first gradient stop must be at 0 (got {})",
            stops[0].pos
        )));
    }
    let last = stops[stops.len() - 1].pos;
    if last != 1.0 {
        return Err(OgError::validation(format!(
            "last gradient stop must be at 1 (got {last})"
        )));
    }
    for (i, pair) in stops.windows(2).enumerate() {
        if pair[1].pos < pair[0].pos {
            return Err(OgError::validation(format!(
                "gradient stops must be sorted ascending (stop {} at {} follows {})",
                i + 1,
                pair[1].pos,
                pair[0].pos
            )));
        }
    }
    Ok(())
}
