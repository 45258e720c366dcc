//! The persistence gateway and the collection rules every store shares.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use pd_core::DesignRecord;
use serde::{Deserialize, Serialize};

/// Persistence gateway for design records.
///
/// Every write replaces the whole collection, so a reader never observes a
/// half-applied change.
pub trait DesignStore: Send + Sync {
    /// All records, most recently inserted first.
    fn list(&self) -> Result<Vec<DesignRecord>, StoreError>;

    fn get(&self, id: &str) -> Result<Option<DesignRecord>, StoreError> {
        Ok(self.list()?.into_iter().find(|d| d.id == id))
    }

    /// Replace the record with the same id (stamping `updated_at`), or insert
    /// a new one at the front. Returns the record as stored.
    fn upsert(&self, record: DesignRecord) -> Result<DesignRecord, StoreError>;

    /// Returns whether a record was removed.
    fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Store a copy of `id` under a fresh id. `None` if `id` is unknown.
    fn duplicate(&self, id: &str) -> Result<Option<DesignRecord>, StoreError>;
}

/// An ordered collection of design records, front = newest insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Designs(pub Vec<DesignRecord>);

impl Designs {
    pub fn get(&self, id: &str) -> Option<&DesignRecord> {
        self.0.iter().find(|d| d.id == id)
    }

    pub fn upsert(&mut self, mut record: DesignRecord, now: DateTime<Utc>) -> DesignRecord {
        match self.0.iter().position(|d| d.id == record.id) {
            Some(i) => {
                record.updated_at = now;
                self.0[i] = record.clone();
                log::debug!("replaced design {} ({})", record.id, record.title);
            }
            None => {
                self.0.insert(0, record.clone());
                log::debug!("inserted design {} ({})", record.id, record.title);
            }
        }
        record
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|d| d.id != id);
        self.0.len() != before
    }

    pub fn duplicate(&mut self, id: &str, now: DateTime<Utc>) -> Option<DesignRecord> {
        let copy = self.get(id)?.duplicate();
        Some(self.upsert(copy, now))
    }
}
