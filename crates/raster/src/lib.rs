//! CPU rasterization of composed scenes.
//!
//! [`SkiaRasterizer`] implements [`folio_traits::Rasterizer`] on top of
//! tiny-skia. Output is straight RGBA8 at `scene size * scale` device pixels,
//! composited over the requested background.

mod glyph;
mod paint;
mod rasterizer;

pub use rasterizer::{SkiaRasterizer, DEFAULT_MAX_PIXELS};
