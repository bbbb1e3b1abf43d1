use crate::export::config::ConfigError;
use crate::export::surface::ViewId;
use folio_layout::LayoutError;
use folio_render_lopdf::RenderError;
use folio_traits::RasterError;
use std::time::Duration;
use thiserror::Error;

/// Why an export produced no artifact.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Document view {0} is not mounted")]
    Snapshot(ViewId),

    #[error("Rasterization failed: {0}")]
    Rasterization(#[from] RasterError),

    #[error("Page layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Export did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Export was cancelled")]
    Cancelled,

    #[error("PDF generation failed: {0}")]
    Pdf(#[from] RenderError),

    #[error("Invalid export configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ExportError {
    /// The single notification shown to a user when an export fails.
    pub fn user_message(&self) -> String {
        format!("Failed to generate PDF: {}", self)
    }

    /// Cancellation is requested by the caller and not reported as a fault.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExportError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_carries_the_cause() {
        let err = ExportError::Rasterization(RasterError::CrossOriginDenied(
            "image at (72, 40)".to_string(),
        ));
        assert_eq!(
            err.user_message(),
            "Failed to generate PDF: Rasterization failed: Cross-origin image not permitted: image at (72, 40)"
        );
        assert!(!err.is_cancelled());
        assert!(ExportError::Cancelled.is_cancelled());
    }

    #[test]
    fn timeout_reports_duration() {
        let err = ExportError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Export did not finish within 250ms");
    }
}
