//! Dashboard-style listing: text search plus a status filter.

use folio_types::{InvoiceRecord, InvoiceStatus};
use serde::{Deserialize, Serialize};

/// Case-insensitive substring search over customer name, company name and
/// invoice number, combined with an optional exact status match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub search: Option<String>,
    pub status: Option<InvoiceStatus>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, record: &InvoiceRecord) -> bool {
        if let Some(status) = self.status
            && record.status != status
        {
            return false;
        }
        let term = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return true,
        };
        let doc = &record.document;
        [
            doc.recipient.name(),
            doc.issuer.name(),
            doc.invoice_number.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    pub fn apply(&self, records: Vec<InvoiceRecord>) -> Vec<InvoiceRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub draft: usize,
    pub sent: usize,
    pub paid: usize,
    pub overdue: usize,
}

impl StatusCounts {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a InvoiceRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.total += 1;
            match record.status {
                InvoiceStatus::Draft => counts.draft += 1,
                InvoiceStatus::Sent => counts.sent += 1,
                InvoiceStatus::Paid => counts.paid += 1,
                InvoiceStatus::Overdue => counts.overdue += 1,
            }
        }
        counts
    }

    pub fn get(&self, status: InvoiceStatus) -> usize {
        match status {
            InvoiceStatus::Draft => self.draft,
            InvoiceStatus::Sent => self.sent,
            InvoiceStatus::Paid => self.paid,
            InvoiceStatus::Overdue => self.overdue,
        }
    }
}
