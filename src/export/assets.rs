//! Fetching and decoding the images a snapshot embeds.

use folio_resource::load_image_source;
use folio_scene::DecodedImage;
use folio_traits::{ResourceError, ResourceProvider};
use folio_types::ImageSource;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("Cannot decode image: {0}")]
    Decode(String),

    #[error("Image load task failed: {0}")]
    Task(String),
}

pub type AssetFuture = Pin<Box<dyn Future<Output = Result<DecodedImage, AssetError>> + Send>>;

/// Produces the decoded pixels for one image reference.
///
/// The returned future must not borrow the loader; it is driven on the
/// runtime alongside the other loads of the same export.
pub trait AssetLoader: Send + Sync + Debug {
    fn load(&self, source: &ImageSource) -> AssetFuture;
}

/// Resolves references through a [`ResourceProvider`] and decodes them with
/// the `image` crate.
///
/// Provider reads and decoding are synchronous, so both run on the blocking
/// pool. The returned future stays cancellable while a slow provider is
/// still reading.
#[derive(Debug, Clone)]
pub struct ProviderAssetLoader {
    provider: Arc<dyn ResourceProvider>,
}

impl ProviderAssetLoader {
    pub fn new(provider: Arc<dyn ResourceProvider>) -> Self {
        Self { provider }
    }
}

impl AssetLoader for ProviderAssetLoader {
    fn load(&self, source: &ImageSource) -> AssetFuture {
        let provider = Arc::clone(&self.provider);
        let source = source.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                let bytes = load_image_source(&source, provider.as_ref())?;
                decode_image(&bytes)
            })
            .await
            .map_err(|e| AssetError::Task(e.to_string()))?
        })
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, AssetError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| AssetError::Decode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::new(width, height, rgba.into_raw())
        .ok_or_else(|| AssetError::Decode(format!("empty {}x{} image", width, height)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_resource::{encode_data_uri, InMemoryResourceProvider};
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn loads_data_uris_and_resources() {
        let provider = InMemoryResourceProvider::new()
            .with("logo.png", png(4, 2))
            .unwrap();
        let loader = ProviderAssetLoader::new(Arc::new(provider));

        let inline = ImageSource::from(encode_data_uri("image/png", &png(3, 3)));
        let image = loader.load(&inline).await.unwrap();
        assert_eq!((image.width(), image.height()), (3, 3));
        assert_eq!(&image.rgba()[..4], &[10, 20, 30, 255]);

        let image = loader.load(&ImageSource::from("logo.png")).await.unwrap();
        assert_eq!((image.width(), image.height()), (4, 2));
    }

    #[tokio::test]
    async fn failures_are_typed() {
        let loader = ProviderAssetLoader::new(Arc::new(InMemoryResourceProvider::new()));
        let missing = loader.load(&ImageSource::from("nope.png")).await.unwrap_err();
        assert!(matches!(missing, AssetError::Resource(ResourceError::NotFound(_))));

        let garbage = ImageSource::from(encode_data_uri("image/png", b"not a png"));
        assert!(matches!(
            loader.load(&garbage).await,
            Err(AssetError::Decode(_))
        ));
    }

    /// Blocks every read until the sender side is dropped.
    #[derive(Debug)]
    struct HeldProvider {
        release: std::sync::Mutex<std::sync::mpsc::Receiver<()>>,
    }

    impl ResourceProvider for HeldProvider {
        fn load(&self, path: &str) -> Result<folio_traits::SharedResourceData, ResourceError> {
            if let Ok(release) = self.release.lock() {
                let _ = release.recv();
            }
            Err(ResourceError::NotFound(path.to_string()))
        }

        fn exists(&self, _path: &str) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "held"
        }
    }

    #[tokio::test]
    async fn slow_provider_does_not_block_the_runtime() {
        let (release, held) = std::sync::mpsc::channel();
        let loader = ProviderAssetLoader::new(Arc::new(HeldProvider {
            release: std::sync::Mutex::new(held),
        }));

        let pending = loader.load(&ImageSource::from("slow.png"));
        let waited = tokio::time::timeout(std::time::Duration::from_millis(50), pending).await;
        assert!(waited.is_err());

        drop(release);
    }
}
