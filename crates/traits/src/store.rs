//! Persistence of invoice records, keyed by record id.

use folio_types::{InvoiceRecord, InvoiceStatus, RecordId};
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// A simple key-value store of invoice records.
///
/// Status changes are not validated; any status may follow any other.
pub trait DocumentStore: Send + Sync + Debug {
    /// All records, most recently created first.
    fn list(&self) -> Result<Vec<InvoiceRecord>, StoreError>;

    fn get(&self, id: &RecordId) -> Result<InvoiceRecord, StoreError>;

    /// Inserts or replaces the record with the same id.
    fn save(&self, record: InvoiceRecord) -> Result<(), StoreError>;

    fn delete(&self, id: &RecordId) -> Result<(), StoreError>;

    fn update_status(&self, id: &RecordId, status: InvoiceStatus) -> Result<(), StoreError>;

    fn name(&self) -> &'static str;
}
