//! Error types for the ordered index.

use thiserror::Error;

/// Failures of keyed index operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    /// `insert` was given a key that is already present.
    #[error("Duplicate key: the index already holds this key")]
    DuplicateKey,

    /// `get`, `get_mut`, or `remove` was given a key that is absent.
    #[error("Key not found in index")]
    KeyNotFound,
}
