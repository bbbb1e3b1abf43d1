//! Image files below a base directory.
//!
//! References are confined to the base directory: absolute paths, `..`
//! segments that escape it, and URL-style references are all reported as
//! `NotFound`.

use folio_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// `None` while the base directory does not exist yet.
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base_path = base_path.as_ref().to_path_buf();
        let canonical_base = base_path.canonicalize().ok();
        Self {
            base_path,
            canonical_base,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, reference: &str) -> Option<PathBuf> {
        if reference.contains("://") || Path::new(reference).is_absolute() {
            return None;
        }

        let joined = self.base_path.join(reference);
        if let (Ok(canonical), Some(base)) = (joined.canonicalize(), &self.canonical_base) {
            return canonical.starts_with(base).then_some(canonical);
        }

        // Not on disk yet: refuse any parent segment outright.
        if Path::new(reference)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }
        Some(joined)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let resolved = self.resolve(path).ok_or_else(|| {
            log::warn!("Refusing resource reference outside base directory: {}", path);
            ResourceError::NotFound(format!("{} (outside base directory)", path))
        })?;

        match std::fs::read(&resolved) {
            Ok(bytes) => Ok(Arc::new(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ResourceError::NotFound(path.to_string()))
            }
            Err(e) => Err(ResourceError::LoadFailed {
                path: path.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn base_path(&self) -> Option<&str> {
        self.base_path.to_str()
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
