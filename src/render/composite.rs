use image::{GrayImage, RgbImage, imageops::FilterType};

use crate::foundation::color::Rgb8;
use crate::foundation::error::{OgError, OgResult};
use crate::foundation::math::mix_u8;

pub fn mix(dst: [u8; 3], src: [u8; 3], m: u8) -> [u8; 3] {
    [
        mix_u8(dst[0], src[0], m),
        mix_u8(dst[1], src[1], m),
        mix_u8(dst[2], src[2], m),
    ]
}

fn check_dims(what: &str, dst: (u32, u32), other: (u32, u32)) -> OgResult<()> {
    if dst != other {
        return Err(OgError::validation(format!(
            "{what} is {}x{} but canvas is {}x{}",
            other.0, other.1, dst.0, dst.1
        )));
    }
    Ok(())
}

/// Blend `src` into `dst` through `mask`: 0 keeps `dst`, 255 takes `src`.
pub fn composite_masked(dst: &mut RgbImage, src: &RgbImage, mask: &GrayImage) -> OgResult<()> {
    check_dims("source layer", dst.dimensions(), src.dimensions())?;
    check_dims("mask", dst.dimensions(), mask.dimensions())?;

    for ((d, s), m) in dst.pixels_mut().zip(src.pixels()).zip(mask.pixels()) {
        let m = m.0[0];
        if m == 0 {
            continue;
        }
        d.0 = mix(d.0, s.0, m);
    }
    Ok(())
}

/// Blend a solid colour into `dst` through `mask`.
pub fn composite_solid_masked(dst: &mut RgbImage, color: Rgb8, mask: &GrayImage) -> OgResult<()> {
    check_dims("mask", dst.dimensions(), mask.dimensions())?;

    let src = [color.r, color.g, color.b];
    for (d, m) in dst.pixels_mut().zip(mask.pixels()) {
        let m = m.0[0];
        if m == 0 {
            continue;
        }
        d.0 = mix(d.0, src, m);
    }
    Ok(())
}

/// Anti-aliasing downsample from the oversampled canvas to the output size.
pub fn downsample(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    image::imageops::resize(img, width, height, FilterType::Lanczos3)
}
