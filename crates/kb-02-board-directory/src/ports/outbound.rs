//! Outbound Ports (Driven Ports / SPI)
//!
//! The persistence mirror. The directory is authoritative in memory; the
//! repository only has to replay saves and deletes and hand every row back
//! on startup.

use crate::domain::changes::{EntityKey, EntityRecord};
use crate::domain::errors::RepositoryError;

/// Persistence mirror for users, boards, and the board id counter.
///
/// `save` and `delete` must be idempotent: saving a row that exists
/// overwrites it, deleting a missing row succeeds.
pub trait DirectoryRepository: Send + Sync {
    fn save(&self, record: &EntityRecord) -> Result<(), RepositoryError>;

    fn delete(&self, key: &EntityKey) -> Result<(), RepositoryError>;

    /// Every stored row, in no particular order.
    fn load(&self) -> Result<Vec<EntityRecord>, RepositoryError>;
}
