//! JSON file backed store.
//!
//! The whole collection lives in one JSON array. Each write is a
//! read-modify-write of that array, finished by writing a sibling temp file
//! and renaming it over the original.

use crate::error::StoreError;
use crate::store::{DesignStore, Designs};
use chrono::Utc;
use pd_core::DesignRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// The file need not exist yet; a missing file reads as an empty
    /// collection and is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Designs, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Designs::default()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Designs::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, designs: &Designs) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(designs)?;
        let tmp = self.temp_path();
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }
        std::fs::write(&tmp, content).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;
        log::debug!("wrote {} designs to {}", designs.0.len(), self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Run `f` over the loaded collection and persist the result.
    fn modify<T>(&self, f: impl FnOnce(&mut Designs) -> T) -> Result<T, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut designs = self.load()?;
        let out = f(&mut designs);
        self.save(&designs)?;
        Ok(out)
    }
}

impl DesignStore for JsonFileStore {
    fn list(&self) -> Result<Vec<DesignRecord>, StoreError> {
        Ok(self.load()?.0)
    }

    fn upsert(&self, record: DesignRecord) -> Result<DesignRecord, StoreError> {
        self.modify(|designs| designs.upsert(record, Utc::now()))
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.modify(|designs| designs.remove(id))
    }

    fn duplicate(&self, id: &str) -> Result<Option<DesignRecord>, StoreError> {
        self.modify(|designs| designs.duplicate(id, Utc::now()))
    }
}
