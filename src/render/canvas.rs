use image::RgbImage;

use crate::foundation::color::Rgb8;
use crate::foundation::error::{OgError, OgResult};

/// Pixel dimensions of a render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> OgResult<Self> {
        if width == 0 || height == 0 {
            return Err(OgError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// The same canvas multiplied by an oversampling factor.
    pub fn scaled(self, factor: u32) -> OgResult<Self> {
        let width = self
            .width
            .checked_mul(factor)
            .ok_or_else(|| OgError::validation("oversampled canvas width overflows u32"))?;
        let height = self
            .height
            .checked_mul(factor)
            .ok_or_else(|| OgError::validation("oversampled canvas height overflows u32"))?;
        Self::new(width, height)
    }

    /// Allocate a buffer filled with `color`.
    pub fn fill(self, color: Rgb8) -> RgbImage {
        RgbImage::from_pixel(self.width, self.height, color.to_pixel())
    }
}
