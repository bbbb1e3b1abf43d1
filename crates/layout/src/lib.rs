//! Layout for the export pipeline.
//!
//! - [`compose`] lays out a settled [`folio_scene::DocumentSnapshot`] as a
//!   [`folio_scene::Scene`] at a fixed logical width.
//! - [`fit_to_page`] places a rendered bitmap on a fixed physical page.
//! - [`FontLibrary`] and [`Typesetter`] supply fonts and text metrics.

mod compose;
mod fit;
mod fonts;
pub mod format;
mod text;

pub use compose::{compose, EMPTY_ITEMS_TEXT, FOOTER_TEXT, PAGE_PADDING};
pub use fit::{fit_to_page, Placement};
pub use fonts::{FontLibrary, FontWeight};
pub use text::{fallback_width, measure_with_face, Align, TextStyle, Typesetter};

use folio_types::PageSize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Bitmap has no area ({width}x{height})")]
    DegenerateBitmap { width: u32, height: u32 },

    #[error("Invalid output page: {0:?}")]
    InvalidPage(PageSize),
}
