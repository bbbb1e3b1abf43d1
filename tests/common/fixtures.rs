#![allow(dead_code)]

use folio::export::{AssetError, AssetFuture, AssetLoader, ExportBuilder, Exporter};
use folio::resource::encode_data_uri;
use folio::scene::{DecodedImage, Scene};
use folio::traits::{
    RasterError, RasterOptions, RasterResult, Rasterizer, ResourceError, ResourceProvider,
    SharedResourceData,
};
use folio::types::{ImageSource, InvoiceDocument, LineItem, Party, Stamp};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Exporter with no settle delay and fallback font metrics.
pub fn test_exporter() -> Exporter {
    ExportBuilder::new()
        .with_settle_delay(Duration::ZERO)
        .build()
        .expect("default exporter builds")
}

pub fn exporter_with_loader(loader: Arc<dyn AssetLoader>) -> Exporter {
    ExportBuilder::new()
        .with_settle_delay(Duration::ZERO)
        .with_asset_loader(loader)
        .build()
        .expect("exporter builds")
}

pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("png encodes");
    out.into_inner()
}

pub fn png_data_uri(width: u32, height: u32, rgba: [u8; 4]) -> ImageSource {
    ImageSource::from(encode_data_uri("image/png", &png_bytes(width, height, rgba)))
}

/// Two items with tax enabled: 1,150,000 + 207,000 = 1,357,000.
pub fn sample_invoice() -> InvoiceDocument {
    InvoiceDocument {
        issuer: Party {
            name: Some("Kampala Design Studio".into()),
            address: Some("Plot 12, Kampala Road".into()),
            contact: Some("+256 700 000000".into()),
            representative: Some("A. Namukasa".into()),
            tagline: Some("Brand and print".into()),
            logo: None,
        },
        recipient: Party::named("Acme Ltd"),
        items: vec![
            LineItem::new("Consulting", 2.0, 500_000.0),
            LineItem::new("Travel", 1.0, 150_000.0),
        ],
        include_tax: true,
        invoice_number: Some("INV-000042".into()),
        ..InvoiceDocument::default()
    }
}

/// A document with every image slot filled with inline PNGs.
pub fn invoice_with_images() -> InvoiceDocument {
    let mut doc = sample_invoice();
    doc.issuer.logo = Some(png_data_uri(40, 20, [20, 60, 200, 255]));
    doc.issuer_signature = Some(png_data_uri(30, 10, [0, 0, 0, 255]));
    doc.recipient_signature = Some(png_data_uri(30, 10, [0, 0, 0, 255]));
    doc.stamp = Stamp {
        applied: true,
        text: "PAID".into(),
    };
    doc
}

/// Enough line items to make the composed document taller than A4.
pub fn tall_invoice(items: usize) -> InvoiceDocument {
    let mut doc = sample_invoice();
    doc.items = (0..items)
        .map(|i| LineItem::new(format!("Line item {}", i + 1), 1.0, 1_000.0))
        .collect();
    doc
}

/// Fails every load immediately.
#[derive(Debug)]
pub struct FailingLoader;

impl AssetLoader for FailingLoader {
    fn load(&self, source: &ImageSource) -> AssetFuture {
        let path = source.as_str().to_string();
        Box::pin(async move { Err(AssetError::Resource(ResourceError::NotFound(path))) })
    }
}

/// Never finishes a load.
#[derive(Debug)]
pub struct StalledLoader;

impl AssetLoader for StalledLoader {
    fn load(&self, _source: &ImageSource) -> AssetFuture {
        Box::pin(std::future::pending())
    }
}

/// Serves the same small image for every reference, including remote ones.
#[derive(Debug)]
pub struct AnySourceLoader;

impl AssetLoader for AnySourceLoader {
    fn load(&self, _source: &ImageSource) -> AssetFuture {
        Box::pin(async {
            DecodedImage::new(2, 2, [255, 0, 0, 255].repeat(4))
                .ok_or_else(|| AssetError::Decode("empty".into()))
        })
    }
}

/// Holds every load until [`release`](GatedLoader::release) is called.
#[derive(Debug)]
pub struct GatedLoader {
    gate: watch::Sender<bool>,
}

impl Default for GatedLoader {
    fn default() -> Self {
        let (gate, _) = watch::channel(false);
        Self { gate }
    }
}

impl GatedLoader {
    pub fn release(&self) {
        self.gate.send_replace(true);
    }
}

impl AssetLoader for GatedLoader {
    fn load(&self, _source: &ImageSource) -> AssetFuture {
        let mut open = self.gate.subscribe();
        Box::pin(async move {
            open.wait_for(|open| *open)
                .await
                .map_err(|_| AssetError::Decode("gate dropped".into()))?;
            DecodedImage::new(1, 1, vec![0, 0, 0, 255])
                .ok_or_else(|| AssetError::Decode("empty".into()))
        })
    }
}

/// A provider whose reads block the calling thread until the returned sender
/// is dropped, like a hung network share.
#[derive(Debug)]
pub struct BlockingProvider {
    release: Mutex<mpsc::Receiver<()>>,
}

impl BlockingProvider {
    pub fn new() -> (Self, mpsc::Sender<()>) {
        let (release, held) = mpsc::channel();
        (
            Self {
                release: Mutex::new(held),
            },
            release,
        )
    }
}

impl ResourceProvider for BlockingProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        if let Ok(held) = self.release.lock() {
            let _ = held.recv();
        }
        Err(ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, _path: &str) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "blocking"
    }
}

/// Returns a solid bitmap of a fixed size whatever the scene.
#[derive(Debug)]
pub struct FixedRasterizer {
    pub width: u32,
    pub height: u32,
}

impl Rasterizer for FixedRasterizer {
    fn rasterize(
        &self,
        _scene: &Scene,
        _options: &RasterOptions,
    ) -> Result<RasterResult, RasterError> {
        RasterResult::new(
            self.width,
            self.height,
            [255u8, 255, 255, 255].repeat((self.width * self.height) as usize),
        )
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Always fails, as a renderer that throws would.
#[derive(Debug)]
pub struct BrokenRasterizer;

impl Rasterizer for BrokenRasterizer {
    fn rasterize(
        &self,
        _scene: &Scene,
        _options: &RasterOptions,
    ) -> Result<RasterResult, RasterError> {
        Err(RasterError::Backend("renderer threw".into()))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}
