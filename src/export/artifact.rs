use folio_layout::Placement;
use std::fmt;
use std::path::{Path, PathBuf};

/// A finished export: the PDF file plus what went into it.
#[derive(Clone, PartialEq)]
pub struct ExportArtifact {
    /// `invoice-<recipient name or "draft">.pdf`.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub placement: Placement,
    pub raster_width: u32,
    pub raster_height: u32,
    pub invoice_number: String,
}

impl fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .field("page_count", &self.page_count)
            .field("placement", &self.placement)
            .field("raster", &(self.raster_width, self.raster_height))
            .field("invoice_number", &self.invoice_number)
            .finish()
    }
}

impl ExportArtifact {
    /// Writes the PDF into `dir` under [`file_name`](Self::file_name).
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}
