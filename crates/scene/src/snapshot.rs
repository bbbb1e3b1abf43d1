use crate::asset::{AssetState, ImageRole, ImageSlot};
use chrono::{DateTime, Local, NaiveDate};
use folio_types::{InvoiceDocument, Size};

/// Reserved tag carried by every snapshot mounted on a render surface.
pub const SNAPSHOT_MARKER: &str = "data-folio-export-snapshot";

/// Identifies one snapshot among everything mounted on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotMarker {
    pub export_id: u64,
}

impl SnapshotMarker {
    pub fn new(export_id: u64) -> Self {
        Self { export_id }
    }

    pub fn tag(&self) -> &'static str {
        SNAPSHOT_MARKER
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotOptions {
    pub logical_width: f32,
    pub identity_box: Size,
    pub image_box: Size,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            logical_width: 794.0,
            identity_box: Size::new(400.0, 180.0),
            image_box: Size::new(150.0, 80.0),
        }
    }
}

/// An isolated, fixed-width copy of a document taken for one export.
///
/// The snapshot owns its document by value; edits made to the live document
/// after capture do not reach it. Display transforms of the live view never
/// enter here at all.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    marker: SnapshotMarker,
    document: InvoiceDocument,
    invoice_number: String,
    issue_date: NaiveDate,
    logical_width: f32,
    slots: Vec<ImageSlot>,
}

impl DocumentSnapshot {
    /// Copies `document` and registers one slot per embedded image.
    ///
    /// A missing invoice number becomes `INV-` followed by the last six digits
    /// of `now` in epoch milliseconds; a missing issue date becomes `now`'s
    /// calendar date.
    pub fn capture(
        document: &InvoiceDocument,
        marker: SnapshotMarker,
        options: SnapshotOptions,
        now: DateTime<Local>,
    ) -> Self {
        let invoice_number = document
            .invoice_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| generated_invoice_number(now.timestamp_millis()));
        let issue_date = document.issue_date.unwrap_or_else(|| now.date_naive());

        let mut slots = Vec::new();
        if let Some(logo) = &document.issuer.logo {
            slots.push(ImageSlot::new(
                ImageRole::IdentityMark,
                logo.clone(),
                options.identity_box,
            ));
        }
        if let Some(sig) = &document.issuer_signature {
            slots.push(ImageSlot::new(
                ImageRole::IssuerSignature,
                sig.clone(),
                options.image_box,
            ));
        }
        if let Some(sig) = &document.recipient_signature {
            slots.push(ImageSlot::new(
                ImageRole::RecipientSignature,
                sig.clone(),
                options.image_box,
            ));
        }

        Self {
            marker,
            document: document.clone(),
            invoice_number,
            issue_date,
            logical_width: options.logical_width,
            slots,
        }
    }

    pub fn marker(&self) -> SnapshotMarker {
        self.marker
    }

    pub fn document(&self) -> &InvoiceDocument {
        &self.document
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn logical_width(&self) -> f32 {
        self.logical_width
    }

    pub fn slots(&self) -> &[ImageSlot] {
        &self.slots
    }

    pub fn slot(&self, role: ImageRole) -> Option<&ImageSlot> {
        self.slots.iter().find(|s| s.role == role)
    }

    /// Records the terminal state of slot `index`. Out-of-range indices are ignored.
    pub fn settle(&mut self, index: usize, state: AssetState) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.state = state;
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = (usize, &ImageSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.state.is_settled())
    }

    pub fn is_settled(&self) -> bool {
        self.slots.iter().all(|s| s.state.is_settled())
    }
}

fn generated_invoice_number(epoch_millis: i64) -> String {
    format!("INV-{:06}", epoch_millis.rem_euclid(1_000_000))
}
