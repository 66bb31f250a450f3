use std::path::Path;

use image::{DynamicImage, RgbImage, imageops::FilterType};

use crate::foundation::color::Rgb8;
use crate::foundation::error::{OgError, OgResult};

use super::composite::mix;

/// Square region of the canvas the photo fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhotoRegion {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl PhotoRegion {
    /// Largest square flush with the right edge of a `width × height` canvas.
    pub fn right_aligned(width: u32, height: u32) -> Self {
        let size = width.min(height);
        Self {
            x: width - size,
            y: 0,
            size,
        }
    }
}

/// Semi-transparent overlay applied uniformly over the photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Veil {
    pub color: Rgb8,
    pub opacity: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhotoParams {
    pub region: PhotoRegion,
    pub background: Rgb8,
    pub fade_width: u32,
    pub veil: Veil,
}

/// Decode the photo. Unlike fonts there is no fallback: a missing photo ends the run.
pub fn load_photo(path: &Path) -> OgResult<DynamicImage> {
    if !path.exists() {
        return Err(OgError::photo(format!(
            "photo '{}' not found; the photo-caption style cannot render without it",
            path.display()
        )));
    }
    image::open(path).map_err(|e| OgError::photo(format!("decode '{}': {e}", path.display())))
}

/// Opacity of the background overlay at column `x` of the fade: 255 at the left edge, falling
/// linearly to about 1 at `fade_width - 1`, and 0 from `fade_width` on.
pub fn fade_opacity(x: u32, fade_width: u32) -> u8 {
    if x >= fade_width {
        return 0;
    }
    let t = f64::from(x) / f64::from(fade_width);
    (255.0 * (1.0 - t)).round().clamp(0.0, 255.0) as u8
}

/// Resize `photo` into the region, darken it with the veil, then fade its left edge into the
/// background colour.
pub fn composite_photo(
    canvas: &mut RgbImage,
    photo: &DynamicImage,
    params: PhotoParams,
) -> OgResult<()> {
    let PhotoParams {
        region,
        background,
        fade_width,
        veil,
    } = params;

    if region.size == 0 {
        return Err(OgError::validation("photo region must be non-empty"));
    }
    let fits_x = region.x.checked_add(region.size).is_some_and(|r| r <= canvas.width());
    let fits_y = region.y.checked_add(region.size).is_some_and(|b| b <= canvas.height());
    if !fits_x || !fits_y {
        return Err(OgError::validation(format!(
            "photo region {}x{} at ({}, {}) exceeds canvas {}x{}",
            region.size,
            region.size,
            region.x,
            region.y,
            canvas.width(),
            canvas.height()
        )));
    }
    if fade_width > region.size {
        return Err(OgError::validation(format!(
            "fade width {fade_width} exceeds photo region size {}",
            region.size
        )));
    }

    let resized = image::imageops::resize(
        &photo.to_rgb8(),
        region.size,
        region.size,
        FilterType::Lanczos3,
    );

    let bg = [background.r, background.g, background.b];
    let veil_rgb = [veil.color.r, veil.color.g, veil.color.b];

    for (x, y, px) in resized.enumerate_pixels() {
        let mut rgb = mix(px.0, veil_rgb, veil.opacity);
        let fade = fade_opacity(x, fade_width);
        if fade > 0 {
            rgb = mix(rgb, bg, fade);
        }
        canvas.put_pixel(region.x + x, region.y + y, image::Rgb(rgb));
    }

    tracing::debug!(
        x = region.x,
        y = region.y,
        size = region.size,
        fade_width,
        veil_opacity = veil.opacity,
        "composited photo"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_endpoints_and_monotonicity() {
        assert_eq!(fade_opacity(0, 280), 255);
        assert_eq!(fade_opacity(279, 280), 1);
        assert_eq!(fade_opacity(280, 280), 0);
        let mut prev = 255u8;
        for x in 1..280 {
            let o = fade_opacity(x, 280);
            assert!(o <= prev, "x = {x}");
            prev = o;
        }
        assert!(fade_opacity(140, 280).abs_diff(128) <= 1);
    }

    #[test]
    fn zero_fade_width_means_no_fade() {
        assert_eq!(fade_opacity(0, 0), 0);
    }

    #[test]
    fn right_aligned_region_is_flush_right() {
        let r = PhotoRegion::right_aligned(1200, 630);
        assert_eq!(r, PhotoRegion { x: 570, y: 0, size: 630 });
        let r = PhotoRegion::right_aligned(100, 300);
        assert_eq!(r, PhotoRegion { x: 0, y: 0, size: 100 });
    }

    fn params(region: PhotoRegion, fade_width: u32, opacity: u8) -> PhotoParams {
        PhotoParams {
            region,
            background: Rgb8::new(10, 10, 12),
            fade_width,
            veil: Veil {
                color: Rgb8::BLACK,
                opacity,
            },
        }
    }

    #[test]
    fn left_edge_blends_into_background() {
        let bg = Rgb8::new(10, 10, 12);
        let mut canvas = RgbImage::from_pixel(40, 20, bg.to_pixel());
        let photo =
            DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 5, image::Rgb([250, 250, 250])));
        let region = PhotoRegion::right_aligned(40, 20);
        composite_photo(&mut canvas, &photo, params(region, 10, 0)).unwrap();

        // Column 0 of the region is pure background, the far right is pure photo.
        for y in 0..20 {
            assert_eq!(canvas.get_pixel(region.x, y).0, [10, 10, 12]);
            assert_eq!(canvas.get_pixel(39, y).0, [250, 250, 250]);
        }
        // Left of the region is untouched.
        assert_eq!(canvas.get_pixel(region.x - 1, 0).0, [10, 10, 12]);

        let row: Vec<u8> = (region.x..40).map(|x| canvas.get_pixel(x, 10).0[0]).collect();
        assert!(row.windows(2).all(|w| w[0] <= w[1]), "{row:?}");
    }

    #[test]
    fn veil_darkens_uniformly() {
        let mut canvas = RgbImage::new(10, 10);
        let photo = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, image::Rgb([200, 100, 50])));
        let region = PhotoRegion::right_aligned(10, 10);
        composite_photo(&mut canvas, &photo, params(region, 0, 128)).unwrap();
        for p in canvas.pixels() {
            assert_eq!(p.0, [100, 50, 25]);
        }
    }

    #[test]
    fn rejects_bad_geometry() {
        let mut canvas = RgbImage::new(10, 10);
        let photo = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        let oversized = PhotoRegion { x: 5, y: 0, size: 10 };
        assert!(composite_photo(&mut canvas, &photo, params(oversized, 0, 0)).is_err());
        let region = PhotoRegion::right_aligned(10, 10);
        assert!(composite_photo(&mut canvas, &photo, params(region, 11, 0)).is_err());
    }

    #[test]
    fn missing_photo_is_a_photo_error() {
        let err = load_photo(Path::new("no/such/headshot.jpg")).unwrap_err();
        assert!(matches!(err, OgError::Photo(_)));
        assert!(err.to_string().contains("not found"));
    }
}
