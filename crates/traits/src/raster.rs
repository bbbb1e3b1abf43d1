//! The "render a scene to a bitmap" capability.

use folio_scene::Scene;
use folio_types::Color;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    #[error("Scene has no drawable area ({width}x{height})")]
    EmptyScene { width: f32, height: f32 },

    #[error("Invalid bitmap: {width}x{height} with {len} bytes")]
    InvalidBitmap { width: u32, height: u32, len: usize },

    #[error("Could not allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("Cross-origin image not permitted: {0}")]
    CrossOriginDenied(String),

    #[error("Rasterizer failure: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Device pixels per logical pixel.
    pub scale: f32,
    /// Painted under everything; exports always use an opaque color.
    pub background: Color,
    pub allow_cross_origin: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: Color::WHITE,
            allow_cross_origin: true,
        }
    }
}

/// A rendered bitmap: straight RGBA8, row-major, top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterResult {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Debug for RasterResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterResult")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl RasterResult {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(RasterError::InvalidBitmap {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.data
    }

    /// Drops the alpha channel. Exports render onto an opaque background, so
    /// nothing is lost.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Converts a composed scene into a bitmap of
/// `ceil(scene.width * scale) x ceil(scene.height * scale)` pixels.
pub trait Rasterizer: Send + Sync + Debug {
    fn rasterize(&self, scene: &Scene, options: &RasterOptions)
    -> Result<RasterResult, RasterError>;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_requires_positive_dimensions() {
        assert!(RasterResult::new(0, 1, vec![]).is_err());
        assert!(RasterResult::new(1, 1, vec![0; 3]).is_err());
        let ok = RasterResult::new(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
        assert_eq!(ok.to_rgb(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(ok.pixel(1, 0), Some([4, 5, 6, 255]));
        assert_eq!(ok.pixel(2, 0), None);
    }

    #[test]
    fn default_options_are_2x_on_white() {
        let options = RasterOptions::default();
        assert_eq!(options.scale, 2.0);
        assert_eq!(options.background, Color::WHITE);
        assert!(options.allow_cross_origin);
    }
}
