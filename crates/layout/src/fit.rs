//! Placement of a rendered bitmap on a fixed physical page.
//!
//! The policy is single-page: the bitmap is scaled to the full page width,
//! and if that makes it taller than the page it is shrunk uniformly until its
//! height equals the page height. Content never spills onto a second page.

use crate::LayoutError;
use folio_types::PageSize;

/// Where the bitmap lands on the page, in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// `1.0` when the full-width image fits, otherwise `page height / candidate height`.
    pub shrink: f32,
}

impl Placement {
    pub fn is_shrunk(&self) -> bool {
        self.shrink < 1.0
    }
}

pub fn fit_to_page(
    pixel_width: u32,
    pixel_height: u32,
    page: PageSize,
) -> Result<Placement, LayoutError> {
    if pixel_width == 0 || pixel_height == 0 {
        return Err(LayoutError::DegenerateBitmap {
            width: pixel_width,
            height: pixel_height,
        });
    }
    if page.width_mm <= 0.0 || page.height_mm <= 0.0 {
        return Err(LayoutError::InvalidPage(page));
    }

    let pw = page.width_mm as f64;
    let ph = page.height_mm as f64;
    let candidate = pixel_height as f64 * pw / pixel_width as f64;

    let placement = if candidate <= ph {
        Placement {
            x: 0.0,
            y: 0.0,
            width: page.width_mm,
            height: candidate as f32,
            shrink: 1.0,
        }
    } else {
        let shrink = ph / candidate;
        Placement {
            x: 0.0,
            y: 0.0,
            width: (pw * shrink) as f32,
            height: page.height_mm,
            shrink: shrink as f32,
        }
    };
    log::debug!(
        "Fit {}x{} px onto {}x{} mm: {:.2}x{:.2} mm (shrink {:.4})",
        pixel_width,
        pixel_height,
        page.width_mm,
        page.height_mm,
        placement.width,
        placement.height,
        placement.shrink
    );
    Ok(placement)
}
