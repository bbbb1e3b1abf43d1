//! Resource providers for document images.
//!
//! - [`FilesystemResourceProvider`] reads files below a base directory.
//! - [`ChainedResourceProvider`] tries several providers in order.
//! - [`InMemoryResourceProvider`] is re-exported from `folio-traits`.
//!
//! [`load_image_source`] is the single entry point the export pipeline uses:
//! inline `data:` URIs are decoded here, everything else goes to a provider.

mod chain;
mod data_uri;
mod filesystem;

pub use chain::ChainedResourceProvider;
pub use data_uri::{decode_data_uri, encode_data_uri, DataUri};
pub use filesystem::FilesystemResourceProvider;
pub use folio_traits::InMemoryResourceProvider;

use folio_traits::{ResourceError, ResourceProvider, SharedResourceData};
use folio_types::ImageSource;
use std::sync::Arc;

/// Resolves an image reference to its encoded bytes.
pub fn load_image_source(
    source: &ImageSource,
    provider: &dyn ResourceProvider,
) -> Result<SharedResourceData, ResourceError> {
    match source {
        ImageSource::DataUri(uri) => decode_data_uri(uri).map(|d| Arc::new(d.bytes)),
        ImageSource::Resource(path) => {
            log::debug!("Loading '{}' through {}", path, provider.name());
            provider.load(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uris_bypass_the_provider() {
        let provider = InMemoryResourceProvider::new();
        let source = ImageSource::from("data:text/plain;base64,aGk=");
        assert_eq!(&*load_image_source(&source, &provider).unwrap(), b"hi");
    }

    #[test]
    fn resources_go_through_the_provider() {
        let provider = InMemoryResourceProvider::new()
            .with("logo.png", vec![9])
            .unwrap();
        let source = ImageSource::from("logo.png");
        assert_eq!(&*load_image_source(&source, &provider).unwrap(), &[9]);

        let missing = ImageSource::from("other.png");
        assert!(matches!(
            load_image_source(&missing, &provider),
            Err(ResourceError::NotFound(_))
        ));
    }
}
