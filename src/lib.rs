//! Procedural OpenGraph share-image generator.
//!
//! One configurable renderer with two styles:
//!
//! - `gradient-title`: a centred title filled with a horizontal multi-stop gradient
//! - `photo-caption`: a faded headshot on the right with a left-aligned title and captions
//!
//! Everything is rendered at an oversampled size and downsampled at the end.
#![forbid(unsafe_code)]

pub mod config;
mod foundation;
pub mod render;
pub mod text;

pub use crate::config::{GradientTitle, PhotoCaption, RenderConfig, Style, TitleFill};
pub use crate::foundation::color::Rgb8;
pub use crate::foundation::error::{OgError, OgResult};
pub use crate::render::canvas::Canvas;
pub use crate::render::composite::{composite_masked, composite_solid_masked, downsample};
pub use crate::render::gradient::{ColorStop, LinearGradient};
pub use crate::render::photo::{PhotoParams, PhotoRegion, Veil, composite_photo, fade_opacity};
pub use crate::render::pipeline::{
    FontUse, RenderReport, Rendered, render, render_to_file, save_png,
};
pub use crate::text::font::{FontHandle, FontSource, LoadedFont, load_font_or_fallback};
pub use crate::text::layout::{
    InkBox, LineLayout, Placement, TextMask, TextSize, fit_font_size, render_text_mask,
};
