//! Loading of embedded image bytes by reference.
//!
//! Documents refer to non-inline images (logos, scanned signatures) by a path
//! or URL. The export pipeline resolves those references through a
//! `ResourceProvider` so it never depends on where the bytes live.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid resource format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

pub type SharedResourceData = Arc<Vec<u8>>;

/// Resolves a resource reference to its raw bytes.
pub trait ResourceProvider: Send + Sync + Debug {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    fn exists(&self, path: &str) -> bool;

    /// Base against which relative references resolve, if the provider has one.
    fn base_path(&self) -> Option<&str> {
        None
    }

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}

/// Provider backed by a map filled up front. Used by tests and by callers
/// that already hold uploaded image bytes.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

fn poisoned(path: &str) -> ResourceError {
    ResourceError::LoadFailed {
        path: path.to_string(),
        message: "resource map lock poisoned".to_string(),
    }
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `data` under `path`, replacing any previous entry.
    pub fn insert(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let path = path.into();
        let mut resources = self.resources.write().map_err(|_| poisoned(&path))?;
        resources.insert(path, Arc::new(data));
        Ok(())
    }

    /// Builder-style `insert` for fixtures.
    pub fn with(self, path: impl Into<String>, data: Vec<u8>) -> Result<Self, ResourceError> {
        self.insert(path, data)?;
        Ok(self)
    }

    pub fn remove(&self, path: &str) -> Option<SharedResourceData> {
        self.resources.write().ok()?.remove(path)
    }

    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        self.resources
            .read()
            .map_err(|_| poisoned(path))?
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}
