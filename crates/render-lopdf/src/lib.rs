//! PDF output for rendered document bitmaps.
//!
//! [`ImagePdfWriter`] writes exactly one page at a fixed physical size and
//! places a single RGB image on it at a [`folio_layout::Placement`].

mod error;
mod writer;

pub use error::RenderError;
pub use writer::{ImagePdfWriter, IMAGE_RESOURCE_NAME};
