use super::assets::{AssetLoader, ProviderAssetLoader};
use super::config::ExportConfig;
use super::context::ExportContext;
use super::orchestrator::Exporter;
use super::surface::RenderSurface;
use crate::error::ExportError;
use folio_layout::{FontLibrary, Typesetter};
use folio_raster::SkiaRasterizer;
use folio_render_lopdf::ImagePdfWriter;
use folio_resource::FilesystemResourceProvider;
use folio_traits::{Rasterizer, ResourceProvider};
use folio_types::PageSize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// A builder for creating an [`Exporter`].
#[derive(Debug, Default)]
pub struct ExportBuilder {
    config: ExportConfig,
    fonts: FontLibrary,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    loader: Option<Arc<dyn AssetLoader>>,
    surface: Option<RenderSurface>,
}

impl ExportBuilder {
    /// Default settings, no fonts beyond built-in fallback metrics.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads settings from a JSON file. Fields the file omits keep their defaults.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ExportError> {
        self.config = ExportConfig::from_file(path)?;
        Ok(self)
    }

    pub fn with_page(mut self, page: PageSize) -> Self {
        self.config.page = page;
        self
    }

    pub fn with_device_scale(mut self, scale: f32) -> Self {
        self.config.device_scale = scale;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Whether images from another origin may be drawn.
    pub fn with_cross_origin(mut self, allow: bool) -> Self {
        self.config.allow_cross_origin = allow;
        self
    }

    /// Scans the host system for installed fonts.
    pub fn with_system_fonts(mut self, system_fonts: bool) -> Self {
        self.fonts = self.fonts.with_system_fonts(system_fonts);
        self
    }

    /// Scans a directory for font files (`.ttf`, `.otf`, ...).
    pub fn with_font_dir<P: AsRef<Path>>(self, path: P) -> Self {
        self.fonts.add_font_dir(path);
        self
    }

    /// Registers one font program from memory. Unparseable data is logged and skipped.
    pub fn with_font_data(self, data: Vec<u8>) -> Self {
        self.fonts.add_font_data(data);
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.fonts = self.fonts.with_family(family);
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn with_asset_loader(mut self, loader: Arc<dyn AssetLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Resolves non-inline image references through `provider`.
    pub fn with_resource_provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.loader = Some(Arc::new(ProviderAssetLoader::new(provider)));
        self
    }

    /// Exports from an existing surface instead of a fresh one.
    pub fn with_surface(mut self, surface: RenderSurface) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Validates the configuration and creates the [`Exporter`].
    pub fn build(self) -> Result<Exporter, ExportError> {
        self.config.validate()?;

        let rasterizer = self
            .rasterizer
            .unwrap_or_else(|| Arc::new(SkiaRasterizer::new()));
        let loader = self.loader.unwrap_or_else(|| {
            Arc::new(ProviderAssetLoader::new(Arc::new(
                FilesystemResourceProvider::new("."),
            )))
        });
        log::debug!(
            "Building exporter: {} rasterizer, {:?}",
            rasterizer.name(),
            self.fonts
        );

        let context = ExportContext {
            pdf_writer: ImagePdfWriter::new(self.config.page),
            config: self.config,
            typesetter: Typesetter::new(self.fonts),
            rasterizer,
            loader,
        };
        Ok(Exporter::new(context, self.surface.unwrap_or_default()))
    }
}
