pub mod fixtures;
pub mod pdf_assertions;

use folio::{ExportArtifact, ExportError, Exporter, ViewTransform};
use folio::types::InvoiceDocument;
use lopdf::Document as LopdfDocument;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around an exported PDF with helper methods
pub struct GeneratedPdf {
    pub artifact: ExportArtifact,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_artifact(artifact: ExportArtifact) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&artifact.bytes)?;
        Ok(Self { artifact, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.artifact.bytes)
    }
}

/// Mounts `document` on the exporter's surface and exports it.
#[allow(dead_code)]
pub async fn export_document(
    exporter: &Exporter,
    document: InvoiceDocument,
) -> Result<ExportArtifact, ExportError> {
    let view = exporter
        .surface()
        .mount_view(document, ViewTransform::default());
    exporter.export(view).await
}

/// Exports `document` and loads the result back with lopdf.
#[allow(dead_code)]
pub async fn generate_pdf(
    exporter: &Exporter,
    document: InvoiceDocument,
) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let artifact = export_document(exporter, document).await?;
    GeneratedPdf::from_artifact(artifact)
}
