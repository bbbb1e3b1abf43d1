//! Invoice composition with deterministic, fixed-page PDF export.
//!
//! The root crate holds the export pipeline ([`export`]) and re-exports the
//! workspace crates it is built from.

pub mod error;
pub mod export;

pub use error::ExportError;
pub use export::{
    CancelToken, ExportArtifact, ExportBuilder, ExportConfig, ExportState, Exporter,
    RenderSurface, ViewId, ViewTransform,
};

pub use folio_layout as layout;
pub use folio_raster as raster;
pub use folio_render_lopdf as render;
pub use folio_resource as resource;
pub use folio_scene as scene;
pub use folio_store as store;
pub use folio_traits as traits;
pub use folio_types as types;
