//! File-backed mirror: every row serialized with `serde_json` into a single
//! document that is rewritten after each change.
//!
//! Writes go to a sibling temporary file that is then renamed over the
//! target, so a crash mid-write leaves the previous document intact.

use crate::domain::changes::{EntityKey, EntityRecord};
use crate::domain::errors::RepositoryError;
use crate::ports::DirectoryRepository;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonFileRepository {
    path: PathBuf,
    rows: Mutex<BTreeMap<EntityKey, EntityRecord>>,
}

impl JsonFileRepository {
    /// Opens `path`, reading any rows already there. A missing file is an
    /// empty mirror.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let rows = match fs::read(&path) {
            Ok(bytes) => {
                let records: Vec<EntityRecord> = serde_json::from_slice(&bytes)
                    .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
                records.into_iter().map(|r| (r.key(), r)).collect()
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(RepositoryError::Io(e.to_string())),
        };
        debug!(path = %path.display(), rows = rows.len(), "Opened JSON mirror");

        Ok(Self {
            path,
            rows: Mutex::new(rows),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, rows: &BTreeMap<EntityKey, EntityRecord>) -> Result<(), RepositoryError> {
        let records: Vec<&EntityRecord> = rows.values().collect();
        let bytes = serde_json::to_vec_pretty(&records)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|e| RepositoryError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| RepositoryError::Io(e.to_string()))
    }
}

impl DirectoryRepository for JsonFileRepository {
    fn save(&self, record: &EntityRecord) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock();
        rows.insert(record.key(), record.clone());
        self.flush(&rows)
    }

    fn delete(&self, key: &EntityKey) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock();
        if rows.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&rows)
    }

    fn load(&self) -> Result<Vec<EntityRecord>, RepositoryError> {
        Ok(self.rows.lock().values().cloned().collect())
    }
}
