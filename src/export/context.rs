use super::assets::AssetLoader;
use super::config::ExportConfig;
use folio_layout::Typesetter;
use folio_render_lopdf::ImagePdfWriter;
use folio_traits::Rasterizer;
use std::sync::Arc;

/// Everything an export reads but never mutates.
///
/// Built once by [`ExportBuilder`](super::ExportBuilder) and shared by every
/// export the resulting [`Exporter`](super::Exporter) runs.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub config: ExportConfig,
    pub typesetter: Typesetter,
    pub rasterizer: Arc<dyn Rasterizer>,
    pub loader: Arc<dyn AssetLoader>,
    pub pdf_writer: ImagePdfWriter,
}
