use crate::domain::changes::{EntityKey, EntityRecord};
use crate::domain::errors::RepositoryError;
use crate::ports::DirectoryRepository;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-memory implementation of DirectoryRepository for tests and for
/// running without a persistent mirror.
pub struct InMemoryRepository {
    rows: RwLock<BTreeMap<EntityKey, EntityRecord>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    /// Pre-populated repository, as if `records` had been saved in order.
    pub fn with_records(records: impl IntoIterator<Item = EntityRecord>) -> Self {
        let rows = records.into_iter().map(|r| (r.key(), r)).collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn get(&self, key: &EntityKey) -> Option<EntityRecord> {
        self.rows.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryRepository for InMemoryRepository {
    fn save(&self, record: &EntityRecord) -> Result<(), RepositoryError> {
        self.rows.write().insert(record.key(), record.clone());
        Ok(())
    }

    fn delete(&self, key: &EntityKey) -> Result<(), RepositoryError> {
        self.rows.write().remove(key);
        Ok(())
    }

    fn load(&self) -> Result<Vec<EntityRecord>, RepositoryError> {
        Ok(self.rows.read().values().cloned().collect())
    }
}
