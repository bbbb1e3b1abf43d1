use chrono::Utc;
use folio_traits::{DocumentStore, StoreError};
use folio_types::{InvoiceRecord, InvoiceStatus, RecordId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Records kept in a map for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    records: RwLock<HashMap<RecordId, InvoiceRecord>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn newest_first(records: &mut [InvoiceRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl DocumentStore for InMemoryDocumentStore {
    fn list(&self) -> Result<Vec<InvoiceRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let mut out: Vec<InvoiceRecord> = records.values().cloned().collect();
        newest_first(&mut out);
        Ok(out)
    }

    fn get(&self, id: &RecordId) -> Result<InvoiceRecord, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn save(&self, record: InvoiceRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        log::debug!("Saving record {}", record.id);
        records.insert(record.id.clone(), record);
        Ok(())
    }

    fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn update_status(&self, id: &RecordId, status: InvoiceStatus) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        log::debug!("Record {}: {} -> {}", id, record.status, status);
        record.status = status;
        record.updated_at = Utc::now();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
