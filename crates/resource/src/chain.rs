use folio_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;

/// Tries each provider in turn; the first hit wins.
///
/// Only `NotFound` falls through to the next provider. Any other error is
/// returned immediately.
#[derive(Debug, Default, Clone)]
pub struct ChainedResourceProvider {
    providers: Vec<Arc<dyn ResourceProvider>>,
}

impl ChainedResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ResourceProvider for ChainedResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        for provider in &self.providers {
            match provider.load(path) {
                Ok(data) => return Ok(data),
                Err(ResourceError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.providers.iter().any(|p| p.exists(path))
    }

    fn name(&self) -> &'static str {
        "ChainedResourceProvider"
    }
}
