use crate::memory::newest_first;
use chrono::Utc;
use folio_traits::{DocumentStore, StoreError};
use folio_types::{InvoiceRecord, InvoiceStatus, RecordId};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Records persisted as one JSON array in a single file.
///
/// Every mutation rewrites the whole file through a temporary file in the
/// same directory, so readers never observe a half-written store. A missing
/// file is an empty store.
#[derive(Debug)]
pub struct JsonFileDocumentStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<InvoiceRecord>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, records: &[InvoiceRecord]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, records)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        log::debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Vec<InvoiceRecord>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut records = self.read_all()?;
        let out = f(&mut records)?;
        self.write_all(&records)?;
        Ok(out)
    }
}

impl DocumentStore for JsonFileDocumentStore {
    fn list(&self) -> Result<Vec<InvoiceRecord>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut records = self.read_all()?;
        newest_first(&mut records);
        Ok(records)
    }

    fn get(&self, id: &RecordId) -> Result<InvoiceRecord, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.read_all()?
            .into_iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn save(&self, record: InvoiceRecord) -> Result<(), StoreError> {
        self.mutate(|records| {
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => records.push(record),
            }
            Ok(())
        })
    }

    fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        self.mutate(|records| {
            let before = records.len();
            records.retain(|r| &r.id != id);
            if records.len() == before {
                return Err(StoreError::NotFound(id.clone()));
            }
            Ok(())
        })
    }

    fn update_status(&self, id: &RecordId, status: InvoiceStatus) -> Result<(), StoreError> {
        self.mutate(|records| {
            let record = records
                .iter_mut()
                .find(|r| &r.id == id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            record.status = status;
            record.updated_at = Utc::now();
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "json-file"
    }
}
