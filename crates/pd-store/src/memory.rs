use crate::error::StoreError;
use crate::store::{DesignStore, Designs};
use chrono::Utc;
use pd_core::DesignRecord;
use std::sync::{Mutex, MutexGuard};

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    designs: Mutex<Designs>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store; `records` is taken as already ordered newest first.
    pub fn with_records(records: Vec<DesignRecord>) -> Self {
        Self {
            designs: Mutex::new(Designs(records)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Designs>, StoreError> {
        self.designs.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl DesignStore for MemoryStore {
    fn list(&self) -> Result<Vec<DesignRecord>, StoreError> {
        Ok(self.lock()?.0.clone())
    }

    fn get(&self, id: &str) -> Result<Option<DesignRecord>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn upsert(&self, record: DesignRecord) -> Result<DesignRecord, StoreError> {
        Ok(self.lock()?.upsert(record, Utc::now()))
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.remove(id))
    }

    fn duplicate(&self, id: &str) -> Result<Option<DesignRecord>, StoreError> {
        Ok(self.lock()?.duplicate(id, Utc::now()))
    }
}
